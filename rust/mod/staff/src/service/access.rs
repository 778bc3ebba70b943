//! Login, registration input and the dashboard role gate.
//!
//! Credentials are compared as stored. There is no hashing and no
//! session token; the caller keeps the returned record as "current user".

use serde::Deserialize;
use tracing::{debug, info};

use staffdesk_core::ServiceError;

use crate::model::{Access, Role, StaffProfile, UserRecord};
use crate::service::StaffService;

/// Input of the registration form.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    pub fn validate(&self) -> Result<(), ServiceError> {
        let mut missing = Vec::new();
        if self.username.trim().is_empty() {
            missing.push("username");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        if self.password.is_empty() {
            missing.push("password");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }

    pub(crate) fn into_profile(self) -> StaffProfile {
        StaffProfile::new(&self.username, &self.email, &self.password)
    }
}

/// Strength label shown under the password field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    Weak,
    Fair,
    Good,
    Strong,
}

impl PasswordStrength {
    /// `None` for an empty password.
    pub fn of(password: &str) -> Option<Self> {
        match password.chars().count() {
            0 => None,
            1..=3 => Some(PasswordStrength::Weak),
            4..=5 => Some(PasswordStrength::Fair),
            6..=7 => Some(PasswordStrength::Good),
            _ => Some(PasswordStrength::Strong),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordStrength::Weak => "weak",
            PasswordStrength::Fair => "fair",
            PasswordStrength::Good => "good",
            PasswordStrength::Strong => "strong",
        }
    }
}

/// Decide whether `user` may open a dashboard restricted to `allowed`.
/// `allowed = None` admits any logged-in user.
pub fn gate(user: Option<&UserRecord>, allowed: Option<Role>) -> Access {
    match (user, allowed) {
        (None, _) => Access::RedirectHome,
        (Some(u), Some(role)) if u.role() != role => Access::Unauthorized,
        _ => Access::Granted,
    }
}

impl StaffService {
    /// Find the user whose email, password and role all match.
    pub fn authenticate(&self, email: &str, password: &str, role: Role) -> Result<UserRecord, ServiceError> {
        match self.users.find_by_key(email) {
            Some(user) if user.profile().password == password && user.role() == role => {
                info!("user '{}' logged in as {}", email, role);
                Ok(user)
            }
            _ => {
                debug!("login rejected for '{}' as {}", email, role);
                Err(ServiceError::Unauthorized("invalid email, password or role".into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_admin() -> StaffService {
        let service = StaffService::in_memory();
        service
            .register_admin(Registration {
                username: "root".into(),
                email: "root@x.com".into(),
                password: "s3cret!!".into(),
            })
            .unwrap();
        service
    }

    #[test]
    fn authenticate_requires_all_three() {
        let service = service_with_admin();

        let user = service.authenticate("root@x.com", "s3cret!!", Role::Admin).unwrap();
        assert_eq!(user.role().dashboard_path(), "/admin");

        for (email, pw, role) in [
            ("root@x.com", "wrong", Role::Admin),
            ("root@x.com", "s3cret!!", Role::Trainer),
            ("nobody@x.com", "s3cret!!", Role::Admin),
        ] {
            let err = service.authenticate(email, pw, role).unwrap_err();
            assert_eq!(err.error_code(), "UNAUTHENTICATED");
        }
    }

    #[test]
    fn gate_outcomes() {
        let service = service_with_admin();
        let admin = service.get_user("root@x.com").unwrap();

        assert_eq!(gate(None, Some(Role::Admin)), Access::RedirectHome);
        assert_eq!(gate(Some(&admin), Some(Role::Admin)), Access::Granted);
        assert_eq!(gate(Some(&admin), Some(Role::Analyst)), Access::Unauthorized);
        assert_eq!(gate(Some(&admin), None), Access::Granted);
    }

    #[test]
    fn password_strength_thresholds() {
        assert_eq!(PasswordStrength::of(""), None);
        assert_eq!(PasswordStrength::of("abc"), Some(PasswordStrength::Weak));
        assert_eq!(PasswordStrength::of("abcd"), Some(PasswordStrength::Fair));
        assert_eq!(PasswordStrength::of("abcdef"), Some(PasswordStrength::Good));
        assert_eq!(PasswordStrength::of("abcdefgh"), Some(PasswordStrength::Strong));
    }

    #[test]
    fn registration_reports_every_missing_field() {
        let input = Registration {
            username: " ".into(),
            email: String::new(),
            password: "x".into(),
        };
        let err = input.validate().unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: username, email");
    }
}
