use serde_json::Value;
use tracing::info;

use staffdesk_core::ServiceError;
use staffdesk_store::{FilterSpec, ALL};

use crate::model::{Role, UserRecord};
use crate::service::access::Registration;
use crate::service::StaffService;

/// Listing filter for one role's table.
#[derive(Debug, Clone, PartialEq)]
pub struct UserQuery {
    /// Free text, matched against the role's search fields.
    pub text: String,
    /// `active` / `inactive` / `on-leave`, or `ALL`.
    pub status: String,
    /// Domain (trainers) or specialization (analysts, counsellors), or `ALL`.
    pub category: String,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            status: ALL.to_string(),
            category: ALL.to_string(),
        }
    }
}

impl StaffService {
    /// Self-registration. Every registered account is an ADMIN.
    pub fn register_admin(&self, input: Registration) -> Result<UserRecord, ServiceError> {
        input.validate()?;
        let user = self.users.create(UserRecord::new(Role::Admin, input.into_profile()))?;
        info!("admin '{}' registered", user.email());
        Ok(user)
    }

    /// Add a staff member of any role.
    pub fn add_user(&self, user: UserRecord) -> Result<UserRecord, ServiceError> {
        self.users.create(user)
    }

    pub fn get_user(&self, email: &str) -> Result<UserRecord, ServiceError> {
        self.users.get_or_err(email)
    }

    /// All users, or only those of `role`, in insertion order.
    pub fn list_users(&self, role: Option<Role>) -> Vec<UserRecord> {
        match role {
            Some(role) => self.users.find_where("role", role.as_str()),
            None => self.users.load_all(),
        }
    }

    /// One role's table after search and dropdown filters.
    pub fn search_users(&self, role: Role, query: &UserQuery) -> Vec<UserRecord> {
        let mut spec = FilterSpec::new()
            .text(&query.text, role.search_fields().iter().copied())
            .role(role.as_str())
            .status(&query.status);
        if let Some(field) = role.category_field() {
            spec = spec.eq(field, &query.category);
        }
        self.users.filter(&spec)
    }

    /// Dropdown values for a role's category filter: `ALL` first, then
    /// each distinct value in first-seen order.
    pub fn category_options(&self, role: Role) -> Vec<String> {
        let mut options = vec![ALL.to_string()];
        if let Some(field) = role.category_field() {
            let members = staffdesk_store::query::to_values(&self.list_users(Some(role)));
            options.extend(staffdesk_store::query::distinct(&members, field));
        }
        options
    }

    fn not_member(role: Role, email: &str) -> ServiceError {
        ServiceError::NotFound(format!("{} '{}' not found", role.as_str().to_lowercase(), email))
    }

    /// Apply an edit-form patch to a member of `role`. The role itself
    /// cannot be changed through an edit.
    pub fn edit_user(&self, role: Role, email: &str, patch: &Value) -> Result<UserRecord, ServiceError> {
        if let Some(new_role) = patch.get("role") {
            if new_role.as_str() != Some(role.as_str()) {
                return Err(ServiceError::Validation(format!(
                    "cannot change role of '{}' from {}",
                    email, role
                )));
            }
        }
        self.users
            .update_if(email, patch, |u| u.role() == role)
            .map_err(|e| if e.is_not_found() { Self::not_member(role, email) } else { e })
    }

    pub fn remove_user(&self, role: Role, email: &str) -> Result<(), ServiceError> {
        self.users
            .delete_if(email, |u| u.role() == role)
            .map_err(|e| if e.is_not_found() { Self::not_member(role, email) } else { e })
    }
}
