//! Record module - the unit of catalog data

use serde::{Deserialize, Serialize};

/// The open key/value shape of a record as the extraction layer produces it.
///
/// Only the normalizer turns this into a [`Record`]; everything upstream of
/// it stays tolerant of missing or oddly shaped fields.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// A catalog record - one named entry within a category.
///
/// Records are immutable snapshots: re-ingestion of the same id replaces the
/// whole stored document, it never patches it. The `alternatives` list holds
/// plain identifiers that are *not* required to resolve to an existing record
/// in this or any category; dangling references are valid and expected, since
/// categories evolve independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Identifier, unique within the record's category
    pub id: String,

    /// Display name
    pub name: String,

    /// Free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Body areas the record targets, in source order
    #[serde(default)]
    pub target_areas: Vec<String>,

    /// Free-form labels
    #[serde(default)]
    pub tags: Vec<String>,

    /// Required equipment
    #[serde(default)]
    pub equipment: Vec<String>,

    /// Ordered execution steps
    #[serde(default)]
    pub steps: Vec<String>,

    /// Safety cautions
    #[serde(default)]
    pub cautions: Vec<String>,

    /// Muscle groups involved
    #[serde(default)]
    pub muscle_groups: Vec<String>,

    /// Repetition count; absent when the source does not state one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,

    /// Set count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,

    /// Rest interval between sets, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_secs: Option<u32>,

    /// Popularity counter carried over from the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<u32>,

    /// Ids of alternative records; dangling entries are preserved verbatim
    #[serde(default)]
    pub alternatives: Vec<String>,

    /// Image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Video reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl Record {
    /// Create a minimal record carrying only an id and a name
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            target_areas: Vec::new(),
            tags: Vec::new(),
            equipment: Vec::new(),
            steps: Vec::new(),
            cautions: Vec::new(),
            muscle_groups: Vec::new(),
            reps: None,
            sets: None,
            rest_secs: None,
            popularity: None,
            alternatives: Vec::new(),
            image_url: None,
            video_url: None,
        }
    }

    /// Whether this is a stub record: every descriptive field empty, with
    /// only id, name, and alternative references populated
    pub fn is_stub(&self) -> bool {
        self.description.is_none()
            && self.target_areas.is_empty()
            && self.tags.is_empty()
            && self.equipment.is_empty()
            && self.steps.is_empty()
            && self.cautions.is_empty()
            && self.muscle_groups.is_empty()
            && self.reps.is_none()
            && self.sets.is_none()
            && self.rest_secs.is_none()
            && self.popularity.is_none()
            && self.image_url.is_none()
            && self.video_url.is_none()
    }
}
