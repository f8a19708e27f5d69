//! Answer sets: the JSON interchange format for per-submission overrides.
//!
//! A file holds a JSON array; each element maps submission keys
//! (`entry.<id>`, `emailAddress`, ...) to the value to submit.

use crate::types::{FormError, FormResult};
use serde_json::{Map, Value};
use std::path::Path;

/// One submission's worth of `submission key -> value` overrides.
pub type AnswerSet = Map<String, Value>;

/// Convert a decoded JSON document into answer sets.
///
/// The document must be an array; elements that are not objects are
/// dropped with a warning.
pub fn answer_sets_from_value(value: Value) -> FormResult<Vec<AnswerSet>> {
    let Value::Array(items) = value else {
        return Err(FormError::InvalidInput(
            "JSON data must be a list of form entry objects".to_string(),
        ));
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match item {
            Value::Object(map) => Some(map),
            other => {
                tracing::warn!("ignoring answer set #{i}: expected an object, got {other}");
                None
            }
        })
        .collect())
}

/// Load answer sets from a JSON file.
pub fn load_answer_sets(path: &Path) -> FormResult<Vec<AnswerSet>> {
    let raw = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw)?;
    answer_sets_from_value(value)
}

/// Write answer sets as a pretty-printed JSON array.
pub fn save_answer_sets(path: &Path, sets: &[AnswerSet]) -> FormResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(sets)?;
    std::fs::write(path, body)?;
    tracing::info!("saved {} answer set(s) to {}", sets.len(), path.display());
    Ok(())
}
