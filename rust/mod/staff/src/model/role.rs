use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Staff role. Decides which dashboard a user lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Trainer,
    Analyst,
    Counsellor,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Trainer, Role::Analyst, Role::Counsellor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Trainer => "TRAINER",
            Role::Analyst => "ANALYST",
            Role::Counsellor => "COUNSELLOR",
        }
    }

    /// Landing path after a successful login.
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Trainer => "/trainer",
            Role::Analyst => "/analyst",
            Role::Counsellor => "/counsellor",
        }
    }

    /// The field a role's listing groups and filters by, if any.
    pub fn category_field(&self) -> Option<&'static str> {
        match self {
            Role::Admin => None,
            Role::Trainer => Some("domain"),
            Role::Analyst | Role::Counsellor => Some("specialization"),
        }
    }

    /// Fields searched by the free-text box of a role's listing.
    pub fn search_fields(&self) -> &'static [&'static str] {
        match self {
            Role::Admin => &["fullName", "email", "username"],
            Role::Trainer => &["fullName", "email", "domain", "phoneNo"],
            Role::Analyst => &["fullName", "email", "specialization", "phoneNo"],
            Role::Counsellor => &["fullName", "email", "specialization", "phoneNo", "languages"],
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "TRAINER" => Ok(Role::Trainer),
            "ANALYST" => Ok(Role::Analyst),
            "COUNSELLOR" => Ok(Role::Counsellor),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Employment status of a staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    OnLeave,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::OnLeave => "on-leave",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "on-leave" => Ok(UserStatus::OnLeave),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

/// How a counsellor meets clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounselingMode {
    Online,
    Offline,
    #[default]
    Both,
}

/// Outcome of the dashboard role gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    /// Nobody is logged in; send them to the home page.
    RedirectHome,
    /// Logged in, wrong role.
    Unauthorized,
}

impl Access {
    /// Path to navigate to when access is not granted.
    pub fn redirect_path(&self) -> Option<&'static str> {
        match self {
            Access::Granted => None,
            Access::RedirectHome => Some("/"),
            Access::Unauthorized => Some("/unauthorized"),
        }
    }
}
