//! Validation of externally sourced entry payloads.
//!
//! Two levels:
//! - [`check_records`] is the shape check: an array whose elements are objects
//!   carrying string `id`, `title` and `type` fields.
//! - [`validate_entries`] runs the shape check and then decodes every element
//!   into a typed [`Entry`], reporting the first record that does not fit.
//!   Decoded progress is clamped into `[0, 1]`. It is not recomputed from the
//!   milestones: a manual value set after the last toggle is legitimate state.

use crate::entry::{Entry, EntryKind};
use crate::error::{ModelError, ModelResult};
use crate::progress::clamp_progress;
use serde::Deserialize;
use serde_json::Value;

const REQUIRED_STRING_FIELDS: [&str; 3] = ["id", "title", "type"];

/// Checks that `value` is an array of entry-like records.
pub fn check_records(value: &Value) -> ModelResult<()> {
    let records = value
        .as_array()
        .ok_or(ModelError::NotAnArray(json_kind(value)))?;

    for (index, record) in records.iter().enumerate() {
        let object = record.as_object().ok_or_else(|| ModelError::InvalidRecord {
            index,
            reason: format!("expected an object, found {}", json_kind(record)),
        })?;

        for field in REQUIRED_STRING_FIELDS {
            match object.get(field) {
                Some(Value::String(_)) => {}
                Some(other) => {
                    return Err(ModelError::InvalidRecord {
                        index,
                        reason: format!("field `{field}` must be a string, found {}", json_kind(other)),
                    });
                }
                None => {
                    return Err(ModelError::InvalidRecord {
                        index,
                        reason: format!("missing field `{field}`"),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Validates `value` as an entry collection and decodes it.
pub fn validate_entries(value: &Value) -> ModelResult<Vec<Entry>> {
    check_records(value)?;

    // check_records guarantees an array here.
    let records = value.as_array().map(Vec::as_slice).unwrap_or_default();
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            if let Some(kind) = record.get("type").and_then(Value::as_str) {
                if EntryKind::parse(kind).is_none() {
                    return Err(ModelError::InvalidRecord {
                        index,
                        reason: format!("unknown entry type `{kind}`"),
                    });
                }
            }
            let mut entry = Entry::deserialize(record).map_err(|e| ModelError::InvalidRecord {
                index,
                reason: e.to_string(),
            })?;
            entry.progress = clamp_progress(entry.progress);
            Ok(entry)
        })
        .collect()
}

/// Boolean form of [`validate_entries`].
pub fn is_entry_collection(value: &Value) -> bool {
    validate_entries(value).is_ok()
}

/// Parses JSON text and validates it as an entry collection.
pub fn parse_entries(text: &str) -> ModelResult<Vec<Entry>> {
    let value: Value = serde_json::from_str(text)?;
    validate_entries(&value)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
