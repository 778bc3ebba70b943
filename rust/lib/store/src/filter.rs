use serde_json::Value;

use crate::query::field_text;

/// Wildcard accepted by every equality selector.
pub const ALL: &str = "ALL";

/// Conjunctive record filter: a free-text query over a set of text
/// fields, plus exact-match selectors.
///
/// An empty query matches every record. A selector whose value is
/// [`ALL`] is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    pub query: String,
    pub text_fields: Vec<String>,
    pub equals: Vec<(String, String)>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring search of `query` over `fields`.
    pub fn text<I, S>(mut self, query: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query = query.to_string();
        self.text_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Require `field == value`, unless `value` is the `ALL` wildcard.
    pub fn eq(mut self, field: &str, value: &str) -> Self {
        if value != ALL {
            self.equals.push((field.to_string(), value.to_string()));
        }
        self
    }

    pub fn status(self, value: &str) -> Self {
        self.eq("status", value)
    }

    pub fn role(self, value: &str) -> Self {
        self.eq("role", value)
    }

    pub fn domain(self, value: &str) -> Self {
        self.eq("domain", value)
    }

    /// Evaluate the filter against a record's JSON form.
    pub fn matches(&self, record: &Value) -> bool {
        self.matches_text(record) && self.matches_equals(record)
    }

    fn matches_text(&self, record: &Value) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        self.text_fields.iter().any(|field| {
            field_text(record, field)
                .map(|text| text.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
    }

    fn matches_equals(&self, record: &Value) -> bool {
        self.equals
            .iter()
            .all(|(field, value)| field_text(record, field).as_deref() == Some(value.as_str()))
    }
}
