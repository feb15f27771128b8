//! Repository for the `preset_packs` table.

use sqlx::SqliteExecutor;
use taleforge_core::types::DbId;

use super::NOW;
use crate::models::preset_pack::{CreatePresetPack, PresetPack, UpdatePresetPack};

const COLUMNS: &str = "id, name, description, author, is_default, created_at, updated_at";

/// Provides CRUD operations for preset packs.
pub struct PresetPackRepo;

impl PresetPackRepo {
    /// Insert a new pack, returning the created row.
    pub async fn create<'e, E>(
        executor: E,
        input: &CreatePresetPack,
        is_default: bool,
    ) -> Result<PresetPack, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO preset_packs (name, description, author, is_default) \
             VALUES (?1, ?2, ?3, ?4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PresetPack>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.author)
            .bind(is_default)
            .fetch_one(executor)
            .await
    }

    /// Find a pack by ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<PresetPack>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM preset_packs WHERE id = ?1");
        sqlx::query_as::<_, PresetPack>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a pack by exact name.
    pub async fn find_by_name<'e, E>(
        executor: E,
        name: &str,
    ) -> Result<Option<PresetPack>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM preset_packs WHERE name = ?1");
        sqlx::query_as::<_, PresetPack>(&query)
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    /// The default pack, if it has been seeded.
    pub async fn find_default<'e, E>(executor: E) -> Result<Option<PresetPack>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM preset_packs WHERE is_default = 1");
        sqlx::query_as::<_, PresetPack>(&query)
            .fetch_optional(executor)
            .await
    }

    /// List all packs, default first, then by name.
    pub async fn list<'e, E>(executor: E) -> Result<Vec<PresetPack>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM preset_packs ORDER BY is_default DESC, name ASC, id ASC"
        );
        sqlx::query_as::<_, PresetPack>(&query)
            .fetch_all(executor)
            .await
    }

    /// Names of every pack.
    pub async fn list_names<'e, E>(executor: E) -> Result<Vec<String>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_scalar::<_, String>("SELECT name FROM preset_packs ORDER BY name")
            .fetch_all(executor)
            .await
    }

    /// Update pack metadata. Only non-`None` fields are applied.
    pub async fn update<'e, E>(
        executor: E,
        id: DbId,
        input: &UpdatePresetPack,
    ) -> Result<Option<PresetPack>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!(
            "UPDATE preset_packs SET \
                name = COALESCE(?2, name), \
                description = COALESCE(?3, description), \
                author = COALESCE(?4, author), \
                updated_at = {NOW} \
             WHERE id = ?1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PresetPack>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.author)
            .fetch_optional(executor)
            .await
    }

    /// Bump `updated_at` after a change to the pack's templates or variables.
    pub async fn touch<'e, E>(executor: E, id: DbId) -> Result<(), sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!("UPDATE preset_packs SET updated_at = {NOW} WHERE id = ?1");
        sqlx::query(&query).bind(id).execute(executor).await?;
        Ok(())
    }

    /// Hard-delete a pack by ID. Returns `true` if a row was removed.
    pub async fn delete<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM preset_packs WHERE id = ?1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
