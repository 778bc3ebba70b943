use crate::error::KVError;

/// KVStore persists opaque values under named slots.
///
/// Slot names are short identifiers such as `users` or `batches`. A slot
/// that was never written reads as `None`; callers decide what an absent
/// slot means.
pub trait KVStore: Send + Sync {
    /// Get the value stored in a slot. Returns None if the slot is empty.
    fn get(&self, slot: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Replace the value of a slot.
    fn set(&self, slot: &str, value: &[u8]) -> Result<(), KVError>;

    /// Clear a slot. Clearing an empty slot is not an error.
    fn delete(&self, slot: &str) -> Result<(), KVError>;
}
