//! Turns raw parsed records into well-shaped `Record`s
//!
//! This is the single point where the open key/value shape becomes strongly
//! typed: missing list fields default to empty, missing numerics stay
//! absent, and a record without an id or name is dropped - one bad record
//! never aborts its file. No cross-record validation happens here; in
//! particular, `alternatives` entries are passed through without checking
//! that they resolve to anything.

use flexion_domain::{RawRecord, Record};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// A record that cannot be shaped into a `Record`
#[derive(Error, Debug)]
pub enum ShapeError {
    /// The record has no usable id
    #[error("missing or empty 'id'")]
    MissingId,

    /// The record has no usable name
    #[error("record '{0}' is missing a name")]
    MissingName(String),
}

/// Shape one raw record into a `Record`
///
/// # Errors
/// Fails when `id` or `name` is missing, empty, or not a string.
pub fn normalize(raw: &RawRecord) -> Result<Record, ShapeError> {
    let id = required_string(raw, "id").ok_or(ShapeError::MissingId)?;
    let name = required_string(raw, "name").ok_or_else(|| ShapeError::MissingName(id.clone()))?;

    Ok(Record {
        id,
        name,
        description: optional_string(raw, "description"),
        target_areas: string_list(raw, "targetAreas"),
        tags: string_list(raw, "tags"),
        equipment: string_list(raw, "equipment"),
        steps: string_list(raw, "steps"),
        cautions: string_list(raw, "cautions"),
        muscle_groups: string_list(raw, "muscleGroups"),
        reps: optional_count(raw, "reps"),
        sets: optional_count(raw, "sets"),
        rest_secs: optional_count(raw, "restSecs"),
        popularity: optional_count(raw, "popularity"),
        alternatives: string_list(raw, "alternatives"),
        image_url: optional_string(raw, "imageUrl"),
        video_url: optional_string(raw, "videoUrl"),
    })
}

fn required_string(raw: &RawRecord, key: &str) -> Option<String> {
    raw.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn optional_string(raw: &RawRecord, key: &str) -> Option<String> {
    required_string(raw, key)
}

fn string_list(raw: &RawRecord, key: &str) -> Vec<String> {
    match raw.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                other => {
                    debug!("Skipping non-string entry in '{}': {}", key, other);
                    None
                }
            })
            .collect(),
        Some(other) => {
            debug!("Field '{}' is not a list: {}", key, other);
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn optional_count(raw: &RawRecord, key: &str) -> Option<u32> {
    match raw.get(key)? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        other => {
            debug!("Field '{}' is not a count: {}", key, other);
            None
        }
    }
}
