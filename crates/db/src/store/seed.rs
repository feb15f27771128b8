//! Seeding the default pack from the shipped catalog.

use serde::Serialize;
use taleforge_core::hashing::content_hash;
use taleforge_core::pack::{unique_pack_name, DEFAULT_PACK_DESCRIPTION, DEFAULT_PACK_NAME};
use taleforge_core::shipped::SHIPPED_TEMPLATES;
use taleforge_core::types::DbId;

use super::PackStore;
use crate::error::StoreResult;
use crate::models::preset_pack::CreatePresetPack;
use crate::repositories::{PackTemplateRepo, PresetPackRepo};

/// What a seeding run changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub pack_id: DbId,
    /// The default pack did not exist and was created.
    pub created_pack: bool,
    /// Shipped templates added to the default pack.
    pub inserted: usize,
    /// Default-pack templates whose content was replaced by newer shipped content.
    pub refreshed: usize,
}

impl SeedReport {
    pub fn is_noop(&self) -> bool {
        !self.created_pack && self.inserted == 0 && self.refreshed == 0
    }
}

impl PackStore {
    /// Bring the default pack in line with the shipped catalog.
    ///
    /// Creates the default pack on first run, inserts shipped templates it is
    /// missing and refreshes rows whose content no longer matches the shipped
    /// content. Running it again changes nothing. Other packs are never
    /// touched.
    pub async fn seed_shipped_templates(&self) -> StoreResult<SeedReport> {
        let mut tx = self.pool.begin().await?;

        let (pack, created_pack) = match PresetPackRepo::find_default(&mut *tx).await? {
            Some(pack) => (pack, false),
            None => {
                let existing = PresetPackRepo::list_names(&mut *tx).await?;
                let input = CreatePresetPack {
                    name: unique_pack_name(DEFAULT_PACK_NAME, &existing),
                    description: Some(DEFAULT_PACK_DESCRIPTION.to_string()),
                    author: None,
                };
                (PresetPackRepo::create(&mut *tx, &input, true).await?, true)
            }
        };

        let mut inserted = 0;
        let mut refreshed = 0;
        for shipped in SHIPPED_TEMPLATES {
            let hash = content_hash(shipped.content);
            match PackTemplateRepo::find(&mut *tx, pack.id, shipped.id).await? {
                Some(existing) if existing.content_hash == hash => continue,
                Some(_) => refreshed += 1,
                None => inserted += 1,
            }
            PackTemplateRepo::upsert(&mut *tx, pack.id, shipped.id, shipped.content, &hash).await?;
        }
        tx.commit().await?;

        let report = SeedReport {
            pack_id: pack.id,
            created_pack,
            inserted,
            refreshed,
        };
        if report.is_noop() {
            tracing::debug!(pack_id = pack.id, "Shipped templates already seeded");
        } else {
            tracing::info!(
                pack_id = pack.id,
                created_pack,
                inserted,
                refreshed,
                "Seeded shipped templates"
            );
        }
        Ok(report)
    }
}
