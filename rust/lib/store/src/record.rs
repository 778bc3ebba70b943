//! RecordStore: CRUD, filtering and aggregates over one slot.
//!
//! The whole collection lives in a single slot as a JSON array. Every
//! mutation loads the array, changes it and writes the full array back.
//! Mutations on one store instance are serialized by an internal mutex,
//! so concurrent callers in the same process cannot lose each other's
//! writes. Array elements that do not decode are invisible to reads and
//! written back unchanged.

use std::collections::{BTreeMap, HashSet};
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use staffdesk_core::{epoch_millis, merge_patch, ServiceError};
use staffdesk_kv::{KVError, KVStore};

use crate::entity::Entity;
use crate::filter::FilterSpec;
use crate::query;

/// One element of a slot's array, as loaded for a write.
#[derive(Serialize)]
#[serde(untagged)]
enum Element<T> {
    Record(T),
    /// Did not decode as `T`. Written back unchanged.
    Raw(Value),
}

impl<T: Entity> Element<T> {
    fn record(&self) -> Option<&T> {
        match self {
            Element::Record(r) => Some(r),
            Element::Raw(_) => None,
        }
    }

    fn key(&self) -> Option<String> {
        match self {
            Element::Record(r) => Some(r.key()),
            Element::Raw(v) => v.get(T::KEY_FIELD).and_then(Value::as_str).map(str::to_string),
        }
    }

    fn id(&self) -> Option<&str> {
        match self {
            Element::Record(r) => Some(r.id()),
            Element::Raw(v) => v.get("id").and_then(Value::as_str),
        }
    }
}

/// Keyed collection of `T` persisted in one KV slot.
pub struct RecordStore<T: Entity> {
    kv: Arc<dyn KVStore>,
    slot: String,
    write_lock: Mutex<()>,
    _phantom: PhantomData<T>,
}

impl<T: Entity> RecordStore<T> {
    /// Store using the entity's default slot.
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self::with_slot(kv, T::default_slot())
    }

    pub fn with_slot(kv: Arc<dyn KVStore>, slot: &str) -> Self {
        Self {
            kv,
            slot: slot.to_string(),
            write_lock: Mutex::new(()),
            _phantom: PhantomData,
        }
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    fn kv_err(e: KVError) -> ServiceError {
        ServiceError::Storage(e.to_string())
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, ServiceError> {
        self.write_lock
            .lock()
            .map_err(|_| ServiceError::Internal(format!("{} store lock poisoned", T::LABEL)))
    }

    fn not_found(key: &str) -> ServiceError {
        ServiceError::NotFound(format!("{} '{}' not found", T::LABEL, key))
    }

    fn duplicate(key: &str) -> ServiceError {
        ServiceError::DuplicateKey(format!(
            "{} with {} '{}' already exists",
            T::LABEL,
            T::KEY_FIELD,
            key
        ))
    }

    /// Decode a slot's bytes. Anything that is not a JSON array reads as
    /// empty. Array elements that do not decode as `T` come back as
    /// [`Element::Raw`].
    fn decode(&self, bytes: &[u8]) -> Vec<Element<T>> {
        let items: Vec<Value> = match serde_json::from_slice(bytes) {
            Ok(items) => items,
            Err(e) => {
                warn!("slot '{}' is corrupt, treating as empty: {}", self.slot, e);
                return Vec::new();
            }
        };
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match serde_json::from_value::<T>(item.clone()) {
                Ok(record) => Element::Record(record),
                Err(e) => {
                    warn!(
                        "slot '{}': {} #{} does not decode, keeping it as is: {}",
                        self.slot,
                        T::LABEL,
                        i,
                        e
                    );
                    Element::Raw(item)
                }
            })
            .collect()
    }

    /// Load for a read-modify-write. Backend failures propagate so a
    /// failed read is never mistaken for an empty collection and then
    /// written back.
    fn load_for_write(&self) -> Result<Vec<Element<T>>, ServiceError> {
        match self.kv.get(&self.slot).map_err(Self::kv_err)? {
            Some(bytes) => Ok(self.decode(&bytes)),
            None => Ok(Vec::new()),
        }
    }

    fn persist<E: Serialize>(&self, elements: &[E]) -> Result<(), ServiceError> {
        let bytes = serde_json::to_vec(elements)
            .map_err(|e| ServiceError::Internal(format!("serialize: {}", e)))?;
        self.kv.set(&self.slot, &bytes).map_err(Self::kv_err)
    }

    fn position(elements: &[Element<T>], key: &str) -> Option<usize> {
        elements
            .iter()
            .position(|e| e.record().is_some_and(|r| r.key() == key))
    }

    /// Smallest timestamp id >= now that is not in `taken`.
    fn next_id<'a>(taken: impl IntoIterator<Item = &'a str>) -> String {
        let taken: HashSet<&str> = taken.into_iter().collect();
        let mut candidate = epoch_millis();
        while taken.contains(candidate.to_string().as_str()) {
            candidate += 1;
        }
        candidate.to_string()
    }

    // ── Reads ──

    /// The full collection in insertion order. Never fails: an absent,
    /// unreadable or corrupt slot yields an empty collection.
    pub fn load_all(&self) -> Vec<T> {
        match self.kv.get(&self.slot) {
            Ok(Some(bytes)) => {
                let records: Vec<T> = self
                    .decode(&bytes)
                    .into_iter()
                    .filter_map(|e| match e {
                        Element::Record(r) => Some(r),
                        Element::Raw(_) => None,
                    })
                    .collect();
                debug!("slot '{}': loaded {} {} records", self.slot, records.len(), T::LABEL);
                records
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("slot '{}' unreadable, treating as empty: {}", self.slot, e);
                Vec::new()
            }
        }
    }

    pub fn find_by_key(&self, key: &str) -> Option<T> {
        self.load_all().into_iter().find(|r| r.key() == key)
    }

    /// Get a record or return NotFound error.
    pub fn get_or_err(&self, key: &str) -> Result<T, ServiceError> {
        self.find_by_key(key).ok_or_else(|| Self::not_found(key))
    }

    pub fn count(&self) -> usize {
        self.load_all().len()
    }

    /// Records matching `spec`, in insertion order.
    pub fn filter(&self, spec: &FilterSpec) -> Vec<T> {
        self.load_all()
            .into_iter()
            .filter(|r| match serde_json::to_value(r) {
                Ok(v) => spec.matches(&v),
                Err(_) => false,
            })
            .collect()
    }

    /// Records whose `field` equals `value` exactly.
    pub fn find_where(&self, field: &str, value: &str) -> Vec<T> {
        self.filter(&FilterSpec::new().eq(field, value))
    }

    pub fn count_where(&self, field: &str, value: &str) -> usize {
        query::count_where(&query::to_values(&self.load_all()), field, value)
    }

    pub fn aggregate_by(&self, field: &str) -> BTreeMap<String, usize> {
        query::aggregate_by(&query::to_values(&self.load_all()), field)
    }

    pub fn distinct(&self, field: &str) -> Vec<String> {
        query::distinct(&query::to_values(&self.load_all()), field)
    }

    pub fn sum(&self, field: &str) -> f64 {
        query::sum(&query::to_values(&self.load_all()), field)
    }

    pub fn average(&self, field: &str) -> f64 {
        query::average(&query::to_values(&self.load_all()), field)
    }

    // ── Writes ──

    /// Insert a new record. Calls `before_create`, assigns a timestamp id
    /// when unset, and rejects a key that is empty or already present.
    pub fn create(&self, mut record: T) -> Result<T, ServiceError> {
        let _guard = self.lock()?;
        let mut elements = self.load_for_write()?;

        record.before_create();
        if record.id().is_empty() {
            record.set_id(Self::next_id(elements.iter().filter_map(Element::id)));
        }

        let key = record.key();
        if key.is_empty() {
            return Err(ServiceError::Validation(format!(
                "{} {} must not be empty",
                T::LABEL,
                T::KEY_FIELD
            )));
        }
        if elements.iter().any(|e| e.key().as_deref() == Some(key.as_str())) {
            return Err(Self::duplicate(&key));
        }

        elements.push(Element::Record(record.clone()));
        self.persist(&elements)?;
        info!("{} '{}' created", T::LABEL, key);
        Ok(record)
    }

    /// Merge `patch` (a JSON object, RFC 7386 semantics) into the record
    /// with `key`. The record's id survives any patch. Changing the key
    /// onto another record's key is rejected.
    pub fn update(&self, key: &str, patch: &Value) -> Result<T, ServiceError> {
        self.update_if(key, patch, |_| true)
    }

    /// Like [`update`](Self::update), but only when the stored record
    /// satisfies `pred`. A record that fails it is reported as NotFound.
    /// `pred` is evaluated under the write lock.
    pub fn update_if<F>(&self, key: &str, patch: &Value, pred: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&T) -> bool,
    {
        if !patch.is_object() {
            return Err(ServiceError::Validation("patch must be a JSON object".into()));
        }

        let _guard = self.lock()?;
        let mut elements = self.load_for_write()?;
        let (idx, current) = Self::position(&elements, key)
            .and_then(|idx| elements[idx].record().map(|r| (idx, r)))
            .filter(|(_, r)| pred(r))
            .ok_or_else(|| Self::not_found(key))?;

        let id = current.id().to_string();
        let mut merged = serde_json::to_value(current)
            .map_err(|e| ServiceError::Internal(format!("serialize: {}", e)))?;
        merge_patch(&mut merged, patch);
        if let Some(obj) = merged.as_object_mut() {
            obj.insert("id".to_string(), Value::String(id.clone()));
        }

        let mut updated: T = serde_json::from_value(merged).map_err(|e| {
            ServiceError::Validation(format!("invalid {} patch: {}", T::LABEL, e))
        })?;
        updated.set_id(id);
        updated.before_update();

        let new_key = updated.key();
        if new_key.is_empty() {
            return Err(ServiceError::Validation(format!(
                "{} {} must not be empty",
                T::LABEL,
                T::KEY_FIELD
            )));
        }
        if new_key != key
            && elements.iter().any(|e| e.key().as_deref() == Some(new_key.as_str()))
        {
            return Err(Self::duplicate(&new_key));
        }

        elements[idx] = Element::Record(updated.clone());
        self.persist(&elements)?;
        info!("{} '{}' updated", T::LABEL, new_key);
        Ok(updated)
    }

    /// Remove the record with `key`.
    pub fn delete(&self, key: &str) -> Result<(), ServiceError> {
        self.delete_if(key, |_| true)
    }

    /// Remove the record with `key` if it satisfies `pred`, checked under
    /// the write lock. Otherwise NotFound.
    pub fn delete_if<F>(&self, key: &str, pred: F) -> Result<(), ServiceError>
    where
        F: FnOnce(&T) -> bool,
    {
        let _guard = self.lock()?;
        let mut elements = self.load_for_write()?;
        let idx = Self::position(&elements, key)
            .filter(|&idx| elements[idx].record().is_some_and(pred))
            .ok_or_else(|| Self::not_found(key))?;

        elements.remove(idx);
        self.persist(&elements)?;
        info!("{} '{}' deleted", T::LABEL, key);
        Ok(())
    }

    /// Replace the whole collection (bulk import). Records without an id
    /// get one; a batch containing duplicate keys is rejected before
    /// anything is written. Returns the number of records stored.
    pub fn replace_all(&self, mut records: Vec<T>) -> Result<usize, ServiceError> {
        let _guard = self.lock()?;

        let mut seen = HashSet::new();
        for i in 0..records.len() {
            if records[i].id().is_empty() {
                let id = Self::next_id(records.iter().map(|r| r.id()));
                records[i].set_id(id);
            }
            let key = records[i].key();
            if key.is_empty() {
                return Err(ServiceError::Validation(format!(
                    "{} #{} has an empty {}",
                    T::LABEL,
                    i,
                    T::KEY_FIELD
                )));
            }
            if !seen.insert(key.clone()) {
                return Err(Self::duplicate(&key));
            }
        }

        self.persist(&records)?;
        info!("slot '{}': replaced with {} {} records", self.slot, records.len(), T::LABEL);
        Ok(records.len())
    }
}
