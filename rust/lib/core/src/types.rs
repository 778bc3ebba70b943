/// Get the current time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Milliseconds since the Unix epoch. Creation-timestamp ids are built
/// from this value.
pub fn epoch_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Apply an RFC 7386 merge patch to `base` in place.
///
/// `null` removes a field, nested objects merge field by field, and any
/// other value replaces what was there. An object patch turns a
/// non-object `base` into `{}` first, so its `null` members never land
/// in the result. A non-object patch replaces `base` outright. Record
/// edits from the dashboards go through here.
pub fn merge_patch(base: &mut serde_json::Value, patch: &serde_json::Value) {
    let Some(patch_obj) = patch.as_object() else {
        *base = patch.clone();
        return;
    };
    if !base.is_object() {
        *base = serde_json::Value::Object(serde_json::Map::new());
    }
    if let Some(base_obj) = base.as_object_mut() {
        for (key, value) in patch_obj {
            if value.is_null() {
                base_obj.remove(key);
            } else {
                let entry = base_obj.entry(key.clone()).or_insert(serde_json::Value::Null);
                merge_patch(entry, value);
            }
        }
    }
}
