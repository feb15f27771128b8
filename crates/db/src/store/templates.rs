//! Template content: validated edits, drift status and reset.

use std::collections::HashMap;

use taleforge_core::error::CoreError;
use taleforge_core::hashing::content_hash;
use taleforge_core::pack::TemplateStatus;
use taleforge_core::shipped;
use taleforge_core::types::DbId;

use super::PackStore;
use crate::error::StoreResult;
use crate::models::pack_template::{PackTemplate, TemplateStatusEntry};
use crate::repositories::{PackTemplateRepo, PackVariableRepo, PresetPackRepo};

impl PackStore {
    /// Every template of a pack, ordered by template id.
    pub async fn get_pack_templates(&self, pack_id: DbId) -> StoreResult<Vec<PackTemplate>> {
        self.require_pack(pack_id).await?;
        Ok(PackTemplateRepo::list_by_pack(&self.pool, pack_id).await?)
    }

    /// One template of a pack, if present.
    pub async fn get_pack_template(
        &self,
        pack_id: DbId,
        template_id: &str,
    ) -> StoreResult<Option<PackTemplate>> {
        Ok(PackTemplateRepo::find(&self.pool, pack_id, template_id).await?)
    }

    /// Validate and store new content for a template.
    ///
    /// Content is stored as given; the hash covers the normalized form.
    /// Invalid content is rejected with [`CoreError::InvalidTemplate`] and
    /// nothing is written. External templates are not validated.
    pub async fn set_template_content(
        &self,
        pack_id: DbId,
        template_id: &str,
        content: &str,
    ) -> StoreResult<PackTemplate> {
        if template_id.trim().is_empty() {
            return Err(CoreError::Validation("Template id must not be empty".to_string()).into());
        }
        self.require_editable_pack(pack_id).await?;

        if !shipped::is_external(template_id) {
            let mut known: Vec<String> = PackVariableRepo::list_by_pack(&self.pool, pack_id)
                .await?
                .into_iter()
                .map(|v| v.variable_name)
                .collect();
            known.extend(shipped::runtime_variables_for(template_id));

            let result = self.validator().validate(content, &known);
            if !result.valid {
                tracing::debug!(
                    pack_id,
                    template_id,
                    errors = result.errors.len(),
                    "Rejected invalid template content"
                );
                return Err(CoreError::InvalidTemplate {
                    template_id: template_id.to_string(),
                    result,
                }
                .into());
            }
        }

        let hash = content_hash(content);
        let mut tx = self.pool.begin().await?;
        let template = PackTemplateRepo::upsert(&mut *tx, pack_id, template_id, content, &hash).await?;
        PresetPackRepo::touch(&mut *tx, pack_id).await?;
        tx.commit().await?;

        tracing::info!(pack_id, template_id, hash = %hash, "Saved template content");
        Ok(template)
    }

    /// Overwrite a template with the default pack's content and hash.
    pub async fn reset_template_to_default(
        &self,
        pack_id: DbId,
        template_id: &str,
    ) -> StoreResult<PackTemplate> {
        self.require_editable_pack(pack_id).await?;
        let default = self.get_default_pack().await?;
        let baseline = PackTemplateRepo::find(&self.pool, default.id, template_id)
            .await?
            .ok_or_else(|| {
                CoreError::NothingToReset(format!(
                    "The default pack has no template '{template_id}'"
                ))
            })?;

        let mut tx = self.pool.begin().await?;
        let template = PackTemplateRepo::upsert(
            &mut *tx,
            pack_id,
            template_id,
            &baseline.content,
            &baseline.content_hash,
        )
        .await?;
        PresetPackRepo::touch(&mut *tx, pack_id).await?;
        tx.commit().await?;

        tracing::info!(pack_id, template_id, "Reset template to default");
        Ok(template)
    }

    /// Reset every template of a pack that differs from the default pack.
    /// Returns the number of templates reset.
    pub async fn reset_all_templates(&self, pack_id: DbId) -> StoreResult<usize> {
        self.require_editable_pack(pack_id).await?;
        let default = self.get_default_pack().await?;
        let baseline = PackTemplateRepo::list_by_pack(&self.pool, default.id).await?;
        let current: HashMap<String, String> = PackTemplateRepo::list_by_pack(&self.pool, pack_id)
            .await?
            .into_iter()
            .map(|t| (t.template_id, t.content_hash))
            .collect();

        let mut tx = self.pool.begin().await?;
        let mut reset = 0;
        for template in &baseline {
            if current.get(&template.template_id) == Some(&template.content_hash) {
                continue;
            }
            PackTemplateRepo::upsert(
                &mut *tx,
                pack_id,
                &template.template_id,
                &template.content,
                &template.content_hash,
            )
            .await?;
            reset += 1;
        }
        if reset > 0 {
            PresetPackRepo::touch(&mut *tx, pack_id).await?;
        }
        tx.commit().await?;

        tracing::info!(pack_id, reset, "Reset pack templates to default");
        Ok(reset)
    }

    /// Drift state of every template in a pack, compared by hash against the
    /// default pack.
    pub async fn get_template_statuses(
        &self,
        pack_id: DbId,
    ) -> StoreResult<Vec<TemplateStatusEntry>> {
        let pack = self.require_pack(pack_id).await?;
        let templates = PackTemplateRepo::list_by_pack(&self.pool, pack_id).await?;
        if pack.is_default {
            return Ok(templates
                .into_iter()
                .map(|t| TemplateStatusEntry {
                    template_id: t.template_id,
                    status: TemplateStatus::Unmodified,
                })
                .collect());
        }

        let default = self.get_default_pack().await?;
        let baseline: HashMap<String, String> = PackTemplateRepo::list_by_pack(&self.pool, default.id)
            .await?
            .into_iter()
            .map(|t| (t.template_id, t.content_hash))
            .collect();

        Ok(templates
            .into_iter()
            .map(|t| {
                let status = TemplateStatus::from_hashes(
                    &t.content_hash,
                    baseline.get(&t.template_id).map(String::as_str),
                );
                TemplateStatusEntry {
                    template_id: t.template_id,
                    status,
                }
            })
            .collect())
    }
}
