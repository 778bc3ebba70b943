use serde_json::{json, Value};
use tracing::info;

use staffdesk_core::ServiceError;
use staffdesk_store::{FilterSpec, ALL};

use crate::model::{BatchRecord, BatchStatus};
use crate::service::StaffService;

const BATCH_SEARCH_FIELDS: [&str; 4] = ["batchName", "batchCode", "trainerName", "domain"];

/// Listing filter for the batch table.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchQuery {
    pub text: String,
    pub domain: String,
    pub status: String,
}

impl Default for BatchQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            domain: ALL.to_string(),
            status: ALL.to_string(),
        }
    }
}

impl StaffService {
    /// Create a batch. Every blank required field is reported at once.
    pub fn create_batch(&self, batch: BatchRecord) -> Result<BatchRecord, ServiceError> {
        let missing = batch.missing_fields();
        if !missing.is_empty() {
            return Err(ServiceError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }
        self.batches.create(batch)
    }

    pub fn get_batch(&self, id: &str) -> Result<BatchRecord, ServiceError> {
        self.batches.get_or_err(id)
    }

    pub fn list_batches(&self) -> Vec<BatchRecord> {
        self.batches.load_all()
    }

    pub fn search_batches(&self, query: &BatchQuery) -> Vec<BatchRecord> {
        let spec = FilterSpec::new()
            .text(&query.text, BATCH_SEARCH_FIELDS)
            .domain(&query.domain)
            .status(&query.status);
        self.batches.filter(&spec)
    }

    /// Domain dropdown: `ALL`, then each distinct domain in first-seen order.
    pub fn batch_domain_options(&self) -> Vec<String> {
        let mut options = vec![ALL.to_string()];
        options.extend(self.batches.distinct("domain"));
        options
    }

    pub fn update_batch(&self, id: &str, patch: &Value) -> Result<BatchRecord, ServiceError> {
        self.batches.update(id, patch)
    }

    pub fn set_batch_status(&self, id: &str, status: BatchStatus) -> Result<BatchRecord, ServiceError> {
        let batch = self.batches.update(id, &json!({ "status": status.as_str() }))?;
        info!("batch '{}' status changed to {}", id, status);
        Ok(batch)
    }

    pub fn delete_batch(&self, id: &str) -> Result<(), ServiceError> {
        self.batches.delete(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(name: &str, code: &str, domain: &str) -> BatchRecord {
        BatchRecord::new(name, code, domain, "Morning", "8 Weeks")
    }

    #[test]
    fn create_assigns_timestamp_id() {
        let service = StaffService::in_memory();
        let created = service.create_batch(batch("Web A", "WD-1", "Web Development")).unwrap();

        assert!(created.id.parse::<i64>().is_ok());
        assert_eq!(created.status, BatchStatus::Scheduled);
        assert!(!created.created_at.is_empty());
        assert_eq!(service.get_batch(&created.id).unwrap(), created);
    }

    #[test]
    fn create_validates_required_fields() {
        let service = StaffService::in_memory();
        let err = service
            .create_batch(BatchRecord::new("", "WD-1", "", "Morning", "4 Weeks"))
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
        assert_eq!(err.to_string(), "missing required fields: batchName, domain");
        assert!(service.list_batches().is_empty());
    }

    #[test]
    fn explicit_duplicate_id_rejected() {
        let service = StaffService::in_memory();
        let mut b = batch("A", "A-1", "AI/ML");
        b.id = "42".into();
        service.create_batch(b.clone()).unwrap();

        let err = service.create_batch(b).unwrap_err();
        assert!(err.is_duplicate_key());
        assert_eq!(service.list_batches().len(), 1);
    }

    #[test]
    fn search_filters_conjunctively() {
        let service = StaffService::in_memory();
        let mut a = batch("Evening Web", "WD-9", "Web Development");
        a.trainer_name = Some("Asha Rao".into());
        let a = service.create_batch(a).unwrap();
        service.create_batch(batch("ML Basics", "ML-1", "AI/ML")).unwrap();
        service.set_batch_status(&a.id, BatchStatus::Active).unwrap();

        let q = BatchQuery { text: "asha".into(), ..Default::default() };
        assert_eq!(service.search_batches(&q).len(), 1);

        let q = BatchQuery { status: "active".into(), ..Default::default() };
        assert_eq!(service.search_batches(&q)[0].id, a.id);

        let q = BatchQuery {
            domain: "AI/ML".into(),
            status: "active".into(),
            ..Default::default()
        };
        assert!(service.search_batches(&q).is_empty());

        assert_eq!(service.search_batches(&BatchQuery::default()).len(), 2);
    }

    #[test]
    fn status_change_and_update_keep_id() {
        let service = StaffService::in_memory();
        let created = service.create_batch(batch("Cloud", "CC-1", "Cloud Computing")).unwrap();

        let done = service.set_batch_status(&created.id, BatchStatus::Completed).unwrap();
        assert_eq!(done.status, BatchStatus::Completed);
        assert_eq!(done.batch_name, "Cloud");

        let updated = service
            .update_batch(&created.id, &json!({"capacity": 25, "enrolledStudents": "20"}))
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.capacity, Some(25));
        assert_eq!(updated.enrolled_students, Some(20));
        assert_eq!(updated.status, BatchStatus::Completed);
    }

    #[test]
    fn form_fields_survive_update() {
        let service = StaffService::in_memory();
        let created = service.create_batch(batch("Intro", "IN-1", "AI/ML")).unwrap();

        service
            .update_batch(
                &created.id,
                &json!({"description": "Intro course", "price": 499, "mode": "online", "venue": "Hall B"}),
            )
            .unwrap();
        service.set_batch_status(&created.id, BatchStatus::Active).unwrap();

        let found = service.get_batch(&created.id).unwrap();
        assert_eq!(found.description.as_deref(), Some("Intro course"));
        assert_eq!(found.price.as_deref(), Some("499"));
        assert_eq!(found.mode.as_deref(), Some("online"));
        assert_eq!(found.extra["venue"], "Hall B");
        assert_eq!(found.status, BatchStatus::Active);
    }

    #[test]
    fn invalid_status_patch_rejected() {
        let service = StaffService::in_memory();
        let created = service.create_batch(batch("X", "X-1", "AI/ML")).unwrap();
        let err = service
            .update_batch(&created.id, &json!({"status": "paused"}))
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
        assert_eq!(service.get_batch(&created.id).unwrap().status, BatchStatus::Scheduled);
    }

    #[test]
    fn missing_batch_operations_are_not_found() {
        let service = StaffService::in_memory();
        assert!(service.get_batch("nope").unwrap_err().is_not_found());
        assert!(service.set_batch_status("nope", BatchStatus::Active).unwrap_err().is_not_found());
        assert!(service.delete_batch("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn delete_and_domain_options() {
        let service = StaffService::in_memory();
        let a = service.create_batch(batch("A", "A", "Web Development")).unwrap();
        service.create_batch(batch("B", "B", "Web Development")).unwrap();
        service.create_batch(batch("C", "C", "Data Science")).unwrap();

        assert_eq!(
            service.batch_domain_options(),
            vec!["ALL", "Web Development", "Data Science"]
        );

        service.delete_batch(&a.id).unwrap();
        assert_eq!(service.list_batches().len(), 2);
    }
}
