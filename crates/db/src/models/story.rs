//! Story model: the fields the prompt pipeline reads.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use taleforge_core::types::{DbId, Timestamp};
use taleforge_core::variables::system::StoryFacts;

/// Per-story override values, keyed by custom variable name.
pub type VariableValues = serde_json::Map<String, serde_json::Value>;

/// A row from the `stories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Story {
    pub id: DbId,
    pub title: String,
    pub genre: Option<String>,
    pub mode: String,
    pub pov: Option<String>,
    pub tense: Option<String>,
    pub protagonist_name: Option<String>,
    pub pack_id: DbId,
    pub custom_variable_values: Json<VariableValues>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Story {
    /// The story fields that feed the system variables.
    pub fn facts(&self) -> StoryFacts {
        StoryFacts {
            title: Some(self.title.clone()),
            genre: self.genre.clone(),
            mode: Some(self.mode.clone()),
            pov: self.pov.clone(),
            tense: self.tense.clone(),
            protagonist_name: self.protagonist_name.clone(),
        }
    }
}

/// DTO for creating a story.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateStory {
    pub title: String,
    pub genre: Option<String>,
    /// Defaults to `adventure`.
    pub mode: Option<String>,
    pub pov: Option<String>,
    pub tense: Option<String>,
    pub protagonist_name: Option<String>,
    pub pack_id: DbId,
}
