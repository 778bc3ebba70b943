//! Field access, coercion and aggregates over records.
//!
//! Records are inspected through their serialized JSON form, so any
//! field an entity persists can be grouped, summed or searched by its
//! JSON name. The functions here are pure; [`RecordStore`](crate::RecordStore)
//! applies them to the loaded collection, and callers can apply them to
//! any subset (for example one role partition).

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Serialize records to JSON values, skipping any that fail to serialize.
pub fn to_values<T: Serialize>(records: &[T]) -> Vec<Value> {
    records
        .iter()
        .filter_map(|r| match serde_json::to_value(r) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("query: record failed to serialize: {}", e);
                None
            }
        })
        .collect()
}

/// Text form of a field. Strings are returned as-is, numbers and booleans
/// are rendered. Absent, null, empty and structured values yield `None`.
pub fn field_text(record: &Value, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Numeric form of a field. Missing or non-numeric input coerces to 0.
pub fn field_number(record: &Value, field: &str) -> f64 {
    let n = match record.get(field) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

/// Count records per distinct field value. Records without a value are
/// left out, so the counts add up to the number of records that have one.
pub fn aggregate_by(records: &[Value], field: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        if let Some(value) = field_text(record, field) {
            *counts.entry(value).or_insert(0) += 1;
        }
    }
    counts
}

/// Distinct non-empty values of a field, in first-seen order.
pub fn distinct(records: &[Value], field: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for record in records {
        if let Some(value) = field_text(record, field) {
            if seen.insert(value.clone()) {
                out.push(value);
            }
        }
    }
    out
}

/// Number of records whose field equals `value` exactly.
pub fn count_where(records: &[Value], field: &str, value: &str) -> usize {
    records
        .iter()
        .filter(|r| field_text(r, field).as_deref() == Some(value))
        .count()
}

pub fn sum(records: &[Value], field: &str) -> f64 {
    records.iter().map(|r| field_number(r, field)).sum()
}

/// `sum / count`, or 0 for an empty collection.
pub fn average(records: &[Value], field: &str) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    sum(records, field) / records.len() as f64
}

/// Integer percentage `part / whole`, rounded half away from zero.
/// Returns 0 when `whole` is 0.
pub fn percent(part: f64, whole: f64) -> u32 {
    if whole <= 0.0 {
        return 0;
    }
    ((part / whole) * 100.0).round().max(0.0) as u32
}
