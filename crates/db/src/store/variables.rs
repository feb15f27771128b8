//! Custom variables of a pack.

use taleforge_core::error::CoreError;
use taleforge_core::types::DbId;
use taleforge_core::variables::validate_definition;

use super::PackStore;
use crate::error::StoreResult;
use crate::models::pack_variable::{CreatePackVariable, PackVariable, UpdatePackVariable};
use crate::repositories::{PackVariableRepo, PresetPackRepo};

impl PackStore {
    /// Every custom variable of a pack in display order.
    pub async fn get_pack_variables(&self, pack_id: DbId) -> StoreResult<Vec<PackVariable>> {
        self.require_pack(pack_id).await?;
        Ok(PackVariableRepo::list_by_pack(&self.pool, pack_id).await?)
    }

    pub async fn create_custom_variable(
        &self,
        pack_id: DbId,
        input: &CreatePackVariable,
    ) -> StoreResult<PackVariable> {
        self.require_editable_pack(pack_id).await?;
        let def = input.to_definition();
        validate_definition(&def)?;
        if PackVariableRepo::find_by_name(&self.pool, pack_id, &def.name)
            .await?
            .is_some()
        {
            return Err(CoreError::DuplicateName {
                kind: "variable",
                name: def.name,
            }
            .into());
        }

        let mut tx = self.pool.begin().await?;
        let sort_order = match input.sort_order {
            Some(order) => order,
            None => PackVariableRepo::next_sort_order(&mut *tx, pack_id).await?,
        };
        let variable = PackVariableRepo::create(&mut *tx, pack_id, &def, sort_order).await?;
        PresetPackRepo::touch(&mut *tx, pack_id).await?;
        tx.commit().await?;

        tracing::info!(pack_id, variable = %variable.variable_name, "Created custom variable");
        Ok(variable)
    }

    pub async fn update_custom_variable(
        &self,
        pack_id: DbId,
        variable_id: DbId,
        input: &UpdatePackVariable,
    ) -> StoreResult<PackVariable> {
        self.require_editable_pack(pack_id).await?;
        let existing = self.require_variable(pack_id, variable_id).await?;

        let def = input.apply(existing.to_definition()?);
        validate_definition(&def)?;
        if def.name != existing.variable_name {
            if let Some(clash) = PackVariableRepo::find_by_name(&self.pool, pack_id, &def.name).await? {
                return Err(CoreError::DuplicateName {
                    kind: "variable",
                    name: clash.variable_name,
                }
                .into());
            }
        }

        let sort_order = input.sort_order.unwrap_or(existing.sort_order);
        let mut tx = self.pool.begin().await?;
        let variable = PackVariableRepo::update(&mut *tx, variable_id, &def, sort_order)
            .await?
            .ok_or_else(|| CoreError::not_found("custom variable", variable_id))?;
        PresetPackRepo::touch(&mut *tx, pack_id).await?;
        tx.commit().await?;

        tracing::info!(pack_id, variable_id, "Updated custom variable");
        Ok(variable)
    }

    pub async fn delete_custom_variable(&self, pack_id: DbId, variable_id: DbId) -> StoreResult<()> {
        self.require_editable_pack(pack_id).await?;
        self.require_variable(pack_id, variable_id).await?;

        let mut tx = self.pool.begin().await?;
        PackVariableRepo::delete(&mut *tx, variable_id).await?;
        PresetPackRepo::touch(&mut *tx, pack_id).await?;
        tx.commit().await?;

        tracing::info!(pack_id, variable_id, "Deleted custom variable");
        Ok(())
    }

    /// Load a variable and check it belongs to `pack_id`.
    async fn require_variable(&self, pack_id: DbId, variable_id: DbId) -> StoreResult<PackVariable> {
        match PackVariableRepo::find_by_id(&self.pool, variable_id).await? {
            Some(variable) if variable.pack_id == pack_id => Ok(variable),
            _ => Err(CoreError::not_found("custom variable", variable_id).into()),
        }
    }
}
