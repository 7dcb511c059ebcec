//! Notes: a titled drawing, the unit that gets saved and loaded.

use crate::store::StrokeStore;
use kurbo::Affine;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// A titled drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Unique note identifier.
    pub id: String,
    pub title: String,
    /// Creation time, seconds since the Unix epoch.
    pub created_at: u64,
    pub drawing: StrokeStore,
    /// View transform the note was last shown with.
    #[serde(default = "identity")]
    pub transform: Affine,
}

fn identity() -> Affine {
    Affine::IDENTITY
}

impl Note {
    /// Create an empty note.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_drawing(title, StrokeStore::new())
    }

    /// Create a note around an existing drawing.
    pub fn with_drawing(title: impl Into<String>, drawing: StrokeStore) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            created_at,
            drawing,
            transform: Affine::IDENTITY,
        }
    }

    /// Serialize the note to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a note from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
