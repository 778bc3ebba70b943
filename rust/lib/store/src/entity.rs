use serde::{de::DeserializeOwned, Serialize};

/// Trait implemented by records kept in a [`RecordStore`](crate::RecordStore).
///
/// `key()` is the natural key used by `find_by_key`, `update` and
/// `delete`. `id()` is the creation-timestamp id, assigned by the store
/// when empty and preserved across updates. For some entities the two
/// coincide.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// JSON name of the key field, used in messages.
    const KEY_FIELD: &'static str;

    /// Short label for log lines and error messages ("user", "batch").
    const LABEL: &'static str;

    /// Slot used when the store is built without an explicit slot name.
    fn default_slot() -> &'static str;

    /// Extract the key value from this instance.
    fn key(&self) -> String;

    /// The creation-timestamp id. Empty until the store assigns one.
    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Called before inserting a new record. Use for auto-fill (timestamps).
    fn before_create(&mut self) {}

    /// Called after a patch has been merged, before the record is written.
    fn before_update(&mut self) {}
}
