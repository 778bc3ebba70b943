use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient::{opt_string, opt_u32};

/// Domains offered when creating a batch.
pub const DOMAIN_OPTIONS: [&str; 5] = [
    "Web Development",
    "Data Science",
    "AI/ML",
    "Cloud Computing",
    "Cybersecurity",
];

pub const TIMING_OPTIONS: [&str; 3] = ["Morning", "Afternoon", "Evening"];

pub const DURATION_OPTIONS: [&str; 4] = ["4 Weeks", "6 Weeks", "8 Weeks", "12 Weeks"];

/// Batch lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    #[default]
    Scheduled,
    Active,
    Completed,
    Cancelled,
}

impl BatchStatus {
    pub const ALL: [BatchStatus; 4] = [
        BatchStatus::Scheduled,
        BatchStatus::Active,
        BatchStatus::Completed,
        BatchStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Scheduled => "scheduled",
            BatchStatus::Active => "active",
            BatchStatus::Completed => "completed",
            BatchStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BatchStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| format!("unknown batch status '{}'", s))
    }
}

/// A scheduled training cohort.
///
/// The shape is open: keys outside the named fields land in `extra` and
/// are written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRecord {
    /// Creation-timestamp id; also the key.
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub batch_name: String,

    /// Older records spell this `batchNo`.
    #[serde(default, alias = "batchNo")]
    pub batch_code: String,

    #[serde(default)]
    pub domain: String,

    #[serde(default)]
    pub timing: String,

    #[serde(default)]
    pub duration: String,

    /// `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    #[serde(default, deserialize_with = "opt_u32", skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,

    #[serde(default, deserialize_with = "opt_u32", skip_serializing_if = "Option::is_none")]
    pub enrolled_students: Option<u32>,

    #[serde(default)]
    pub status: BatchStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainer_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainer_experience: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// `online`, `offline` or `hybrid`; other values are kept as given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<String>>,

    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// RFC 3339 creation timestamp.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_at: String,

    /// Fields this model does not name. Kept so edits and rewrites
    /// never drop them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BatchRecord {
    pub fn new(batch_name: &str, batch_code: &str, domain: &str, timing: &str, duration: &str) -> Self {
        Self {
            batch_name: batch_name.to_string(),
            batch_code: batch_code.to_string(),
            domain: domain.to_string(),
            timing: timing.to_string(),
            duration: duration.to_string(),
            ..Default::default()
        }
    }

    /// Parsed start date; `None` when absent or not `YYYY-MM-DD`.
    pub fn start(&self) -> Option<NaiveDate> {
        self.start_date
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d").ok())
    }

    /// Names of required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.batch_name.trim().is_empty() {
            missing.push("batchName");
        }
        if self.batch_code.trim().is_empty() {
            missing.push("batchCode");
        }
        if self.domain.trim().is_empty() {
            missing.push("domain");
        }
        if self.timing.trim().is_empty() {
            missing.push("timing");
        }
        if self.duration.trim().is_empty() {
            missing.push("duration");
        }
        missing
    }
}
