use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::KVError;
use crate::traits::KVStore;

/// MemoryKV keeps slots in a process-local map. Nothing survives the
/// process; useful for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryKV {
    slots: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryKV {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of non-empty slots.
    pub fn len(&self) -> usize {
        self.slots.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> KVError {
    KVError::Poisoned("memory kv".into())
}

impl KVStore for MemoryKV {
    fn get(&self, slot: &str) -> Result<Option<Vec<u8>>, KVError> {
        let slots = self.slots.read().map_err(poisoned)?;
        Ok(slots.get(slot).cloned())
    }

    fn set(&self, slot: &str, value: &[u8]) -> Result<(), KVError> {
        let mut slots = self.slots.write().map_err(poisoned)?;
        slots.insert(slot.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, slot: &str) -> Result<(), KVError> {
        let mut slots = self.slots.write().map_err(poisoned)?;
        slots.remove(slot);
        Ok(())
    }
}
