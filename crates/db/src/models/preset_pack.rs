//! Preset pack model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taleforge_core::types::{DbId, Timestamp};

/// A row from the `preset_packs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PresetPack {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub is_default: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new pack.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePresetPack {
    pub name: String,
    pub description: Option<String>,
    pub author: Option<String>,
}

impl CreatePresetPack {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// DTO for editing pack metadata. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePresetPack {
    pub name: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
}
