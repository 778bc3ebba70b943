use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ServiceError;

/// Storage configuration shared by the library and the CLI.
///
/// Read from a TOML file with [`StoreConfig::load`]; the CLI layers its
/// flags on top. Every field has a default, so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding the database file.
    pub data_dir: Option<PathBuf>,

    /// Path to the redb database file.
    /// Defaults to `{data_dir}/staffdesk.redb` if not specified.
    pub db_path: Option<PathBuf>,

    /// Slot holding the user collection.
    pub users_slot: String,

    /// Slot holding the batch collection.
    pub batches_slot: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            db_path: None,
            users_slot: "users".to_string(),
            batches_slot: "batches".to_string(),
        }
    }
}

impl StoreConfig {
    /// Load configuration from a TOML file. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ServiceError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| ServiceError::Storage(format!("read {}: {}", path.display(), e)))?;
        let config: StoreConfig = toml::from_str(&content)
            .map_err(|e| ServiceError::Validation(format!("parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Slot names must be non-empty and distinct.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.users_slot.trim().is_empty() || self.batches_slot.trim().is_empty() {
            return Err(ServiceError::Validation("slot names must not be empty".into()));
        }
        if self.users_slot == self.batches_slot {
            return Err(ServiceError::Validation(format!(
                "users and batches share slot '{}'",
                self.users_slot
            )));
        }
        Ok(())
    }

    /// Resolve the redb database path, falling back to `{data_dir}/staffdesk.redb`.
    pub fn resolve_db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(|| {
            self.data_dir
                .as_ref()
                .map(|d| d.join("staffdesk.redb"))
                .unwrap_or_else(|| PathBuf::from("staffdesk.redb"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_defaults() {
        let config = StoreConfig {
            data_dir: Some(PathBuf::from("/data")),
            ..Default::default()
        };
        assert_eq!(config.resolve_db_path(), PathBuf::from("/data/staffdesk.redb"));

        let config = StoreConfig::default();
        assert_eq!(config.resolve_db_path(), PathBuf::from("staffdesk.redb"));

        let config = StoreConfig {
            data_dir: Some(PathBuf::from("/data")),
            db_path: Some(PathBuf::from("/elsewhere/x.redb")),
            ..Default::default()
        };
        assert_eq!(config.resolve_db_path(), PathBuf::from("/elsewhere/x.redb"));
    }

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("staffdesk.toml");
        std::fs::write(&path, "data_dir = \"/srv/staff\"\nbatches_slot = \"cohorts\"\n").unwrap();

        let config = StoreConfig::load(&path).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/staff")));
        assert_eq!(config.users_slot, "users");
        assert_eq!(config.batches_slot, "cohorts");
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let config = StoreConfig::load(Path::new("/nonexistent/staffdesk.toml")).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_shared_slot_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "users_slot = \"x\"\nbatches_slot = \"x\"\n").unwrap();

        let err = StoreConfig::load(&path).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }
}
