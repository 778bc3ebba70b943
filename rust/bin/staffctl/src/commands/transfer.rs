//! Bulk import/export of whole collections as JSON arrays.

use anyhow::Result;
use staffdesk_staff::{BatchRecord, StaffService, UserRecord};
use tracing::info;

use crate::Collection;

/// Replace `collection` with the records in `content`. Nothing is written
/// unless every element decodes and keys are unique.
pub fn import(service: &StaffService, collection: Collection, content: &str) -> Result<usize> {
    let n = match collection {
        Collection::Users => {
            let users: Vec<UserRecord> = serde_json::from_str(content)
                .map_err(|e| anyhow::anyhow!("Invalid users file: {}", e))?;
            service.users().replace_all(users)?
        }
        Collection::Batches => {
            let batches: Vec<BatchRecord> = serde_json::from_str(content)
                .map_err(|e| anyhow::anyhow!("Invalid batches file: {}", e))?;
            service.batches().replace_all(batches)?
        }
    };
    info!("imported {} records into {:?}", n, collection);
    Ok(n)
}

pub fn export(service: &StaffService, collection: Collection) -> Result<String> {
    let json = match collection {
        Collection::Users => serde_json::to_string_pretty(&service.list_users(None))?,
        Collection::Batches => serde_json::to_string_pretty(&service.list_batches())?,
    };
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use staffdesk_staff::Role;

    const USERS: &str = r#"[
        {"role": "ADMIN", "email": "root@x.com", "username": "root", "password": "pw"},
        {"role": "TRAINER", "email": "t@x.com", "domain": "AI/ML", "salary": 40000}
    ]"#;

    #[test]
    fn import_then_export_users() {
        let service = StaffService::in_memory();
        assert_eq!(import(&service, Collection::Users, USERS).unwrap(), 2);

        let trainer = service.get_user("t@x.com").unwrap();
        assert_eq!(trainer.role(), Role::Trainer);
        assert_eq!(trainer.profile().salary.as_deref(), Some("40000"));
        assert!(!trainer.profile().id.is_empty());

        let exported: serde_json::Value =
            serde_json::from_str(&export(&service, Collection::Users).unwrap()).unwrap();
        assert_eq!(exported.as_array().unwrap().len(), 2);
        assert_eq!(exported[1]["role"], "TRAINER");
    }

    #[test]
    fn import_with_duplicate_keys_writes_nothing() {
        let service = StaffService::in_memory();
        let dup = r#"[{"role": "ADMIN", "email": "a@x.com"}, {"role": "TRAINER", "email": "a@x.com"}]"#;
        assert!(import(&service, Collection::Users, dup).is_err());
        assert!(service.list_users(None).is_empty());
    }

    #[test]
    fn import_rejects_non_array() {
        let service = StaffService::in_memory();
        assert!(import(&service, Collection::Batches, r#"{"id": "1"}"#).is_err());
    }

    #[test]
    fn import_replaces_existing_batches() {
        let service = StaffService::in_memory();
        let first = r#"[{"id": "1", "batchName": "A"}, {"id": "2", "batchName": "B"}]"#;
        import(&service, Collection::Batches, first).unwrap();
        import(&service, Collection::Batches, r#"[{"id": "3", "batchName": "C"}]"#).unwrap();

        let batches = service.list_batches();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].batch_name, "C");
    }
}
