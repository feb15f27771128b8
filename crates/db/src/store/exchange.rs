//! Pack export and import.

use std::collections::HashSet;

use chrono::Utc;
use taleforge_core::error::CoreError;
use taleforge_core::exchange::{
    validate_import, ExportedPack, ExportedTemplate, ExportedVariable, PackExport, FORMAT_VERSION,
};
use taleforge_core::hashing::content_hash;
use taleforge_core::pack::unique_pack_name;
use taleforge_core::shipped;
use taleforge_core::types::DbId;

use super::PackStore;
use crate::error::StoreResult;
use crate::models::preset_pack::{CreatePresetPack, PresetPack};
use crate::repositories::{PackTemplateRepo, PackVariableRepo, PresetPackRepo};

impl PackStore {
    /// Snapshot a pack as a portable envelope.
    pub async fn export_pack(&self, pack_id: DbId) -> StoreResult<PackExport> {
        let pack = self.require_pack(pack_id).await?;
        let templates = PackTemplateRepo::list_by_pack(&self.pool, pack_id).await?;
        let variables = PackVariableRepo::list_by_pack(&self.pool, pack_id).await?;

        let variables = variables
            .iter()
            .map(|row| {
                Ok(ExportedVariable {
                    definition: row.to_definition()?,
                    sort_order: row.sort_order,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        tracing::info!(pack_id, templates = templates.len(), "Exported preset pack");
        Ok(PackExport {
            format_version: FORMAT_VERSION,
            exported_at: Utc::now(),
            pack: ExportedPack {
                name: pack.name,
                description: pack.description,
                author: pack.author,
            },
            templates: templates
                .into_iter()
                .map(|t| ExportedTemplate {
                    template_id: t.template_id,
                    content: t.content,
                    content_hash: Some(t.content_hash),
                })
                .collect(),
            variables,
        })
    }

    /// Create a new pack from an exported envelope.
    ///
    /// The envelope is checked in full before anything is written. The pack
    /// name gets a ` (2)`, ` (3)` ... suffix if taken, templates the envelope
    /// lacks are copied from the default pack, and hashes are recomputed.
    pub async fn import_pack(&self, export: &PackExport) -> StoreResult<PresetPack> {
        validate_import(export)?;

        let custom_names: Vec<String> = export
            .variables
            .iter()
            .map(|v| v.definition.name.clone())
            .collect();
        for template in &export.templates {
            if shipped::is_external(&template.template_id) {
                continue;
            }
            let mut known = custom_names.clone();
            known.extend(shipped::runtime_variables_for(&template.template_id));
            let result = self.validator().validate(&template.content, &known);
            if !result.valid {
                return Err(CoreError::InvalidTemplate {
                    template_id: template.template_id.clone(),
                    result,
                }
                .into());
            }
        }

        let default = self.get_default_pack().await?;
        let mut tx = self.pool.begin().await?;

        let existing = PresetPackRepo::list_names(&mut *tx).await?;
        let input = CreatePresetPack {
            name: unique_pack_name(&export.pack.name, &existing),
            description: export.pack.description.clone(),
            author: export.pack.author.clone(),
        };
        let pack = PresetPackRepo::create(&mut *tx, &input, false).await?;

        let mut imported = HashSet::new();
        for template in &export.templates {
            let hash = content_hash(&template.content);
            PackTemplateRepo::upsert(&mut *tx, pack.id, &template.template_id, &template.content, &hash)
                .await?;
            imported.insert(template.template_id.as_str());
        }

        let mut filled = 0;
        for baseline in PackTemplateRepo::list_by_pack(&mut *tx, default.id).await? {
            if imported.contains(baseline.template_id.as_str()) {
                continue;
            }
            PackTemplateRepo::upsert(
                &mut *tx,
                pack.id,
                &baseline.template_id,
                &baseline.content,
                &baseline.content_hash,
            )
            .await?;
            filled += 1;
        }

        for variable in &export.variables {
            PackVariableRepo::create(&mut *tx, pack.id, &variable.definition, variable.sort_order)
                .await?;
        }
        tx.commit().await?;

        tracing::info!(
            pack_id = pack.id,
            name = %pack.name,
            templates = export.templates.len(),
            filled_from_default = filled,
            variables = export.variables.len(),
            "Imported preset pack"
        );
        Ok(pack)
    }
}
