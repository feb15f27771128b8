//! Pack lifecycle: list, create, edit, delete.

use taleforge_core::error::CoreError;
use taleforge_core::pack::{validate_description, validate_pack_name};
use taleforge_core::types::DbId;

use super::PackStore;
use crate::error::StoreResult;
use crate::models::preset_pack::{CreatePresetPack, PresetPack, UpdatePresetPack};
use crate::repositories::{PackTemplateRepo, PackVariableRepo, PresetPackRepo, StoryRepo};

impl PackStore {
    /// Every pack, default first, then by name.
    pub async fn get_all_packs(&self) -> StoreResult<Vec<PresetPack>> {
        Ok(PresetPackRepo::list(&self.pool).await?)
    }

    pub async fn get_pack(&self, pack_id: DbId) -> StoreResult<PresetPack> {
        self.require_pack(pack_id).await
    }

    /// The seeded baseline pack.
    pub async fn get_default_pack(&self) -> StoreResult<PresetPack> {
        PresetPackRepo::find_default(&self.pool).await?.ok_or_else(|| {
            CoreError::NotFound {
                entity: "preset pack",
                key: "default".to_string(),
            }
            .into()
        })
    }

    /// Create a pack as a full copy of the default pack's templates and
    /// custom variables.
    pub async fn create_pack(&self, input: &CreatePresetPack) -> StoreResult<PresetPack> {
        validate_pack_name(&input.name)?;
        validate_description("Description", input.description.as_deref())?;
        validate_description("Author", input.author.as_deref())?;
        self.ensure_name_free(&input.name, None).await?;
        let default = self.get_default_pack().await?;

        let mut tx = self.pool.begin().await?;
        let pack = PresetPackRepo::create(&mut *tx, input, false).await?;
        let templates = PackTemplateRepo::copy_from_pack(&mut *tx, default.id, pack.id).await?;
        let variables = PackVariableRepo::copy_from_pack(&mut *tx, default.id, pack.id).await?;
        tx.commit().await?;

        tracing::info!(
            pack_id = pack.id,
            name = %pack.name,
            templates,
            variables,
            "Created preset pack"
        );
        Ok(pack)
    }

    /// Edit pack name, description or author. The default pack is read-only.
    pub async fn update_pack(
        &self,
        pack_id: DbId,
        input: &UpdatePresetPack,
    ) -> StoreResult<PresetPack> {
        self.require_editable_pack(pack_id).await?;
        if let Some(name) = input.name.as_deref() {
            validate_pack_name(name)?;
            self.ensure_name_free(name, Some(pack_id)).await?;
        }
        validate_description("Description", input.description.as_deref())?;
        validate_description("Author", input.author.as_deref())?;

        let mut tx = self.pool.begin().await?;
        let pack = PresetPackRepo::update(&mut *tx, pack_id, input)
            .await?
            .ok_or_else(|| CoreError::not_found("preset pack", pack_id))?;
        tx.commit().await?;

        tracing::info!(pack_id, "Updated preset pack");
        Ok(pack)
    }

    /// Delete a pack with its templates and variables.
    ///
    /// Fails with `CannotDeleteDefault` for the default pack and with
    /// `PackInUse` while any story is assigned to it.
    pub async fn delete_pack(&self, pack_id: DbId) -> StoreResult<()> {
        let pack = self.require_pack(pack_id).await?;
        if pack.is_default {
            return Err(CoreError::CannotDeleteDefault.into());
        }
        let story_count = StoryRepo::count_by_pack(&self.pool, pack_id).await?;
        if story_count > 0 {
            return Err(CoreError::PackInUse {
                pack_id,
                story_count,
            }
            .into());
        }

        let mut tx = self.pool.begin().await?;
        PackTemplateRepo::delete_by_pack(&mut *tx, pack_id).await?;
        PackVariableRepo::delete_by_pack(&mut *tx, pack_id).await?;
        PresetPackRepo::delete(&mut *tx, pack_id).await?;
        tx.commit().await?;

        tracing::info!(pack_id, name = %pack.name, "Deleted preset pack");
        Ok(())
    }

    /// Whether [`PackStore::delete_pack`] would succeed right now.
    pub async fn can_delete_pack(&self, pack_id: DbId) -> StoreResult<bool> {
        let pack = self.require_pack(pack_id).await?;
        if pack.is_default {
            return Ok(false);
        }
        Ok(StoryRepo::count_by_pack(&self.pool, pack_id).await? == 0)
    }

    async fn ensure_name_free(&self, name: &str, except: Option<DbId>) -> StoreResult<()> {
        match PresetPackRepo::find_by_name(&self.pool, name).await? {
            Some(existing) if Some(existing.id) != except => Err(CoreError::DuplicateName {
                kind: "pack",
                name: name.to_string(),
            }
            .into()),
            _ => Ok(()),
        }
    }
}
