//! The preset pack store.
//!
//! [`PackStore`] is the only write path into the pack tables. Every mutation
//! checks its preconditions (existence, default-pack protection, name
//! uniqueness, template validity) before writing and runs its writes in one
//! transaction. Callers re-read state after an awaited mutation.

mod exchange;
mod packs;
mod seed;
mod story;
mod templates;
mod variables;

use std::sync::Arc;

use taleforge_core::error::CoreError;
use taleforge_core::template::TemplateEngine;
use taleforge_core::types::DbId;
use taleforge_core::validation::TemplateValidator;
use taleforge_core::variables::VariableRegistry;

use crate::error::StoreResult;
use crate::models::preset_pack::PresetPack;
use crate::repositories::PresetPackRepo;
use crate::DbPool;

pub use seed::SeedReport;

/// Preset pack persistence service.
///
/// Holds the long-lived engine and registry it validates writes against.
/// Cloning is cheap.
#[derive(Clone)]
pub struct PackStore {
    pool: DbPool,
    engine: Arc<TemplateEngine>,
    registry: Arc<VariableRegistry>,
}

impl PackStore {
    pub fn new(pool: DbPool, engine: Arc<TemplateEngine>, registry: Arc<VariableRegistry>) -> Self {
        Self {
            pool,
            engine,
            registry,
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn engine(&self) -> &TemplateEngine {
        &self.engine
    }

    pub fn registry(&self) -> &VariableRegistry {
        &self.registry
    }

    pub fn validator(&self) -> TemplateValidator<'_> {
        TemplateValidator::new(&self.engine, &self.registry)
    }

    /// Load a pack or fail with `NotFound`.
    async fn require_pack(&self, pack_id: DbId) -> StoreResult<PresetPack> {
        PresetPackRepo::find_by_id(&self.pool, pack_id)
            .await?
            .ok_or_else(|| CoreError::not_found("preset pack", pack_id).into())
    }

    /// Load a pack that may be edited: it must exist and not be the default.
    async fn require_editable_pack(&self, pack_id: DbId) -> StoreResult<PresetPack> {
        let pack = self.require_pack(pack_id).await?;
        if pack.is_default {
            return Err(CoreError::Validation(
                "The default pack is read-only. Create a new pack to customize templates"
                    .to_string(),
            )
            .into());
        }
        Ok(pack)
    }
}
