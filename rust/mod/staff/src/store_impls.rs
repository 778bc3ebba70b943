//! Entity implementations for staff models.

use staffdesk_core::now_rfc3339;
use staffdesk_store::Entity;

use crate::model::{BatchRecord, UserRecord};

// Users are keyed by email; the timestamp id rides along.
impl Entity for UserRecord {
    const KEY_FIELD: &'static str = "email";
    const LABEL: &'static str = "user";

    fn default_slot() -> &'static str {
        "users"
    }

    fn key(&self) -> String {
        self.email().to_string()
    }

    fn id(&self) -> &str {
        &self.profile().id
    }

    fn set_id(&mut self, id: String) {
        self.profile_mut().id = id;
    }

    fn before_create(&mut self) {
        let profile = self.profile_mut();
        if profile.created_at.is_empty() {
            profile.created_at = now_rfc3339();
        }
    }
}

// Batches are keyed by their own timestamp id.
impl Entity for BatchRecord {
    const KEY_FIELD: &'static str = "id";
    const LABEL: &'static str = "batch";

    fn default_slot() -> &'static str {
        "batches"
    }

    fn key(&self) -> String {
        self.id.clone()
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn before_create(&mut self) {
        if self.created_at.is_empty() {
            self.created_at = now_rfc3339();
        }
    }
}
