pub mod access;
pub mod batches;
pub mod stats;
pub mod users;

use std::sync::Arc;

use tracing::info;

use staffdesk_core::{ServiceError, StoreConfig};
use staffdesk_kv::{KVStore, MemoryKV, RedbStore};
use staffdesk_store::RecordStore;

use crate::model::{BatchRecord, UserRecord};

pub use access::{gate, PasswordStrength, Registration};
pub use batches::BatchQuery;
pub use stats::{BatchStats, Overview, StaffStats};
pub use users::UserQuery;

/// Staff service. Owns the user and batch stores and the business rules
/// the dashboards apply on top of them.
pub struct StaffService {
    pub(crate) users: RecordStore<UserRecord>,
    pub(crate) batches: RecordStore<BatchRecord>,
}

impl StaffService {
    /// Build on an existing KV backend, using the slot names in `config`.
    pub fn new(kv: Arc<dyn KVStore>, config: &StoreConfig) -> Result<Self, ServiceError> {
        config.validate()?;
        Ok(Self {
            users: RecordStore::with_slot(kv.clone(), &config.users_slot),
            batches: RecordStore::with_slot(kv, &config.batches_slot),
        })
    }

    /// Open (or create) the redb database named by `config`.
    pub fn open(config: &StoreConfig) -> Result<Self, ServiceError> {
        let db_path = config.resolve_db_path();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ServiceError::Storage(format!("create {}: {}", parent.display(), e)))?;
        }
        let kv: Arc<dyn KVStore> = Arc::new(
            RedbStore::open(&db_path).map_err(|e| ServiceError::Storage(e.to_string()))?,
        );
        info!("staff store opened at {}", db_path.display());
        Self::new(kv, config)
    }

    /// A service whose data lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            users: RecordStore::new(Arc::new(MemoryKV::new())),
            batches: RecordStore::new(Arc::new(MemoryKV::new())),
        }
    }

    pub fn users(&self) -> &RecordStore<UserRecord> {
        &self.users
    }

    pub fn batches(&self) -> &RecordStore<BatchRecord> {
        &self.batches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, StaffProfile};

    #[test]
    fn open_creates_data_dir_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            data_dir: Some(dir.path().join("nested")),
            ..Default::default()
        };

        {
            let service = StaffService::open(&config).unwrap();
            service
                .add_user(UserRecord::new(Role::Trainer, StaffProfile::new("t", "t@x.com", "pw")))
                .unwrap();
        }

        let service = StaffService::open(&config).unwrap();
        assert_eq!(service.users().count(), 1);
        assert!(dir.path().join("nested/staffdesk.redb").exists());
    }

    #[test]
    fn custom_slots_are_used() {
        let kv: Arc<dyn KVStore> = Arc::new(MemoryKV::new());
        let config = StoreConfig {
            users_slot: "people".into(),
            batches_slot: "cohorts".into(),
            ..Default::default()
        };
        let service = StaffService::new(kv.clone(), &config).unwrap();
        service
            .add_user(UserRecord::new(Role::Admin, StaffProfile::new("r", "r@x.com", "pw")))
            .unwrap();

        assert!(kv.get("people").unwrap().is_some());
        assert!(kv.get("users").unwrap().is_none());
        assert_eq!(service.batches().slot(), "cohorts");
    }

    #[test]
    fn shared_slot_config_rejected() {
        let config = StoreConfig {
            users_slot: "x".into(),
            batches_slot: "x".into(),
            ..Default::default()
        };
        let err = StaffService::new(Arc::new(MemoryKV::new()), &config).err().unwrap();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
    }
}
