use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient::opt_string;
use super::role::{CounselingMode, Role, UserStatus};

/// Fields every staff member has, whatever the role.
///
/// Numeric-looking fields (`age`, `salary`, `experience`) are kept as the
/// text the forms produced; aggregates coerce them when summing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffProfile {
    /// Creation-timestamp id, assigned on create.
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub username: String,

    /// Natural key: at most one user per email.
    pub email: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub full_name: String,

    #[serde(default)]
    pub status: UserStatus,

    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,

    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,

    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub phone_no: Option<String>,

    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joining_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// RFC 3339 creation timestamp.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,
}

impl StaffProfile {
    pub fn new(username: &str, email: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    #[serde(flatten)]
    pub profile: StaffProfile,

    /// Keys no named field claims.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerUser {
    #[serde(flatten)]
    pub profile: StaffProfile,

    /// Teaching domain, e.g. "Web Development".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Keys no named field claims.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalystUser {
    #[serde(flatten)]
    pub profile: StaffProfile,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<String>,

    /// Keys no named field claims.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounsellorUser {
    #[serde(flatten)]
    pub profile: StaffProfile,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<String>,

    #[serde(default)]
    pub counseling_mode: CounselingMode,

    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub max_clients: Option<String>,

    /// Keys no named field claims.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A staff member, tagged by `role` on the wire.
///
/// ```json
/// {"role": "TRAINER", "email": "a@x.com", "status": "active", "domain": "AI/ML"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRecord {
    Admin(AdminUser),
    Trainer(TrainerUser),
    Analyst(AnalystUser),
    Counsellor(CounsellorUser),
}

impl UserRecord {
    /// A record of the given role with no role-specific attributes set.
    pub fn new(role: Role, profile: StaffProfile) -> Self {
        match role {
            Role::Admin => UserRecord::Admin(AdminUser {
                profile,
                ..Default::default()
            }),
            Role::Trainer => UserRecord::Trainer(TrainerUser {
                profile,
                ..Default::default()
            }),
            Role::Analyst => UserRecord::Analyst(AnalystUser {
                profile,
                ..Default::default()
            }),
            Role::Counsellor => UserRecord::Counsellor(CounsellorUser {
                profile,
                ..Default::default()
            }),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            UserRecord::Admin(_) => Role::Admin,
            UserRecord::Trainer(_) => Role::Trainer,
            UserRecord::Analyst(_) => Role::Analyst,
            UserRecord::Counsellor(_) => Role::Counsellor,
        }
    }

    pub fn profile(&self) -> &StaffProfile {
        match self {
            UserRecord::Admin(u) => &u.profile,
            UserRecord::Trainer(u) => &u.profile,
            UserRecord::Analyst(u) => &u.profile,
            UserRecord::Counsellor(u) => &u.profile,
        }
    }

    pub fn profile_mut(&mut self) -> &mut StaffProfile {
        match self {
            UserRecord::Admin(u) => &mut u.profile,
            UserRecord::Trainer(u) => &mut u.profile,
            UserRecord::Analyst(u) => &mut u.profile,
            UserRecord::Counsellor(u) => &mut u.profile,
        }
    }

    pub fn email(&self) -> &str {
        &self.profile().email
    }

    pub fn status(&self) -> UserStatus {
        self.profile().status
    }

    pub fn full_name(&self) -> &str {
        &self.profile().full_name
    }

    /// First word of the full name, falling back to the username.
    pub fn first_name(&self) -> &str {
        self.full_name()
            .split_whitespace()
            .next()
            .unwrap_or(&self.profile().username)
    }

    /// Trainer domain or analyst/counsellor specialization.
    pub fn category(&self) -> Option<&str> {
        match self {
            UserRecord::Admin(_) => None,
            UserRecord::Trainer(u) => u.domain.as_deref(),
            UserRecord::Analyst(u) => u.specialization.as_deref(),
            UserRecord::Counsellor(u) => u.specialization.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trainer_json_shape() {
        let mut trainer = TrainerUser {
            profile: StaffProfile::new("asha", "asha@x.com", "pw"),
            domain: Some("Web Development".into()),
            ..Default::default()
        };
        trainer.profile.full_name = "Asha Rao".into();
        let value = serde_json::to_value(UserRecord::Trainer(trainer)).unwrap();

        assert_eq!(value["role"], "TRAINER");
        assert_eq!(value["email"], "asha@x.com");
        assert_eq!(value["fullName"], "Asha Rao");
        assert_eq!(value["status"], "active");
        assert_eq!(value["domain"], "Web Development");
        assert!(value.get("salary").is_none());
    }

    #[test]
    fn decodes_form_shaped_record() {
        let value = json!({
            "id": "1718000000000",
            "username": "meera",
            "email": "meera@x.com",
            "password": "secret",
            "role": "COUNSELLOR",
            "fullName": "Meera Nair",
            "age": 34,
            "salary": "42000",
            "specialization": "Career",
            "counselingMode": "online",
            "maxClients": "12",
            "status": "on-leave",
            "createdAt": "2024-06-10T08:00:00Z"
        });
        let user: UserRecord = serde_json::from_value(value).unwrap();

        assert_eq!(user.role(), Role::Counsellor);
        assert_eq!(user.status(), UserStatus::OnLeave);
        assert_eq!(user.profile().age.as_deref(), Some("34"));
        assert_eq!(user.category(), Some("Career"));
        match user {
            UserRecord::Counsellor(c) => {
                assert_eq!(c.counseling_mode, CounselingMode::Online);
                assert_eq!(c.max_clients.as_deref(), Some("12"));
            }
            other => panic!("expected counsellor, got {:?}", other),
        }
    }

    #[test]
    fn registration_shape_decodes_as_admin() {
        let value = json!({"username": "root", "email": "root@x.com", "password": "pw", "role": "ADMIN"});
        let user: UserRecord = serde_json::from_value(value).unwrap();
        assert_eq!(user.role(), Role::Admin);
        assert_eq!(user.status(), UserStatus::Active);
        assert_eq!(user.first_name(), "root");
    }

    #[test]
    fn unknown_keys_survive_roundtrip() {
        let value = json!({
            "role": "ANALYST",
            "email": "z@x.com",
            "tools": "SQL",
            "linkedin": "in/zoya",
            "languages": ["en", "hi"]
        });
        let user: UserRecord = serde_json::from_value(value).unwrap();
        match &user {
            UserRecord::Analyst(a) => {
                assert_eq!(a.tools.as_deref(), Some("SQL"));
                assert_eq!(a.extra["linkedin"], "in/zoya");
                assert!(!a.extra.contains_key("role"));
                assert!(!a.extra.contains_key("email"));
            }
            other => panic!("expected analyst, got {:?}", other),
        }

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["role"], "ANALYST");
        assert_eq!(back["linkedin"], "in/zoya");
        assert_eq!(back["languages"], json!(["en", "hi"]));
    }

    #[test]
    fn unknown_role_is_rejected() {
        let value = json!({"email": "x@x.com", "role": "MANAGER"});
        assert!(serde_json::from_value::<UserRecord>(value).is_err());
    }

    #[test]
    fn new_builds_empty_role_extras() {
        let user = UserRecord::new(Role::Analyst, StaffProfile::new("a", "a@x.com", "p"));
        assert_eq!(user.role(), Role::Analyst);
        assert_eq!(user.category(), None);
        assert_eq!(user.email(), "a@x.com");
    }
}
