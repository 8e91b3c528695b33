//! The accumulated application record.
//!
//! A record is a flat map of field name → value. Steps contribute their
//! fields through shallow merges: a later patch overwrites same-named
//! fields and leaves every other field untouched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─── Field values ─────────────────────────────────────────────────────────────

/// A single field's value as collected from the form.
///
/// Serialized untagged so the wire and snapshot formats carry plain JSON
/// strings, numbers, and booleans — the same shapes the original endpoints
/// expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Flag(bool),
}

impl FieldValue {
    /// The text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The numeric content, if this is a number value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// True when the value carries no usable content (empty or
    /// whitespace-only text). Numbers and flags are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}

// ─── Record ───────────────────────────────────────────────────────────────────

/// Field name → value mapping accumulated across all steps.
///
/// A `BTreeMap` keeps serialization order stable, which makes snapshots and
/// submission payloads deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl ApplicationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field by name.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// The field's text content, or `""` when absent or non-text.
    pub fn text(&self, field: &str) -> &str {
        self.get(field).and_then(FieldValue::as_text).unwrap_or("")
    }

    /// Set one field, overwriting any prior value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Shallow-overwrite merge: every field in `patch` overwrites the
    /// same-named field here; fields not named in `patch` are preserved.
    pub fn merge(&mut self, patch: ApplicationRecord) {
        for (name, value) in patch.fields {
            self.fields.insert(name, value);
        }
    }

    /// A copy of this record with `patch` merged on top.
    pub fn merged(&self, patch: &ApplicationRecord) -> ApplicationRecord {
        let mut out = self.clone();
        out.merge(patch.clone());
        out
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }
}

impl FromIterator<(String, FieldValue)> for ApplicationRecord {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
