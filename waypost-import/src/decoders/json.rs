//! JSON decoder
//!
//! Accepts either a single top-level object (treated as a one-element list)
//! or an array of objects. The `ratings` array is re-serialized to its
//! canonical JSON text so the rating parser always receives a string.

use super::{DecodeError, RawRecord, RawRow};
use crate::normalize::SkipReason;
use serde_json::Value;
use std::path::Path;

pub fn decode(path: &Path, source_file: &str) -> Result<Vec<RawRow>, DecodeError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| DecodeError::FileAccess(path.to_path_buf(), e.to_string()))?;

    let data: Value =
        serde_json::from_str(&contents).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;

    let items = match data {
        Value::Object(_) => vec![data],
        Value::Array(items) => items,
        other => {
            return Err(DecodeError::InvalidJson(format!(
                "top-level value must be an object or an array, got {}",
                value_kind(&other)
            )))
        }
    };

    Ok(items
        .iter()
        .map(|item| extract(item, source_file))
        .collect())
}

fn extract(item: &Value, source_file: &str) -> RawRow {
    let Value::Object(object) = item else {
        return Err(SkipReason::NotAnObject);
    };

    // Empty object when absent (individual coordinates then default to
    // "0"); present but not an object is a per-row type failure
    let coordinates = match object.get("coordinates") {
        None => serde_json::Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => return Err(SkipReason::MissingField),
    };

    Ok(RawRecord {
        external_id: text(object.get("id")),
        name: text(object.get("name")),
        latitude: number_text(coordinates.get("latitude"))?,
        longitude: number_text(coordinates.get("longitude"))?,
        category: text(object.get("category")),
        ratings: ratings_text(object.get("ratings")),
        description: Some(text(object.get("description"))),
        source_file: source_file.to_string(),
    })
}

/// Stringify a scalar field value; absent and null become empty
fn text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Coordinate values: absent defaults to "0", numbers and numeric strings
/// pass through for the normalizer to parse, anything else skips the row
fn number_text(value: Option<&Value>) -> Result<String, SkipReason> {
    match value {
        None => Ok("0".to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(SkipReason::MissingField),
    }
}

/// Re-serialize the ratings array to canonical JSON text; absent, null and
/// empty arrays all reduce to the no-rating empty string
fn ratings_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::Array(items)) if items.is_empty() => String::new(),
        Some(other) => serde_json::to_string(other).unwrap_or_default(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
