//! Pack template model and status listing.

use serde::Serialize;
use sqlx::FromRow;
use taleforge_core::pack::TemplateStatus;
use taleforge_core::types::{DbId, Timestamp};

/// A row from the `pack_templates` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PackTemplate {
    pub id: DbId,
    pub pack_id: DbId,
    pub template_id: String,
    pub content: String,
    /// SHA-256 of the normalized content.
    pub content_hash: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Drift state of one template in a pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateStatusEntry {
    pub template_id: String,
    pub status: TemplateStatus,
}
