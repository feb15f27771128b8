//! Repository for the `pack_variables` table.

use sqlx::types::Json;
use sqlx::SqliteExecutor;
use taleforge_core::types::DbId;
use taleforge_core::variables::VariableDefinition;

use super::NOW;
use crate::models::pack_variable::PackVariable;

const COLUMNS: &str = "id, pack_id, variable_name, display_name, variable_type, is_required, \
     default_value, enum_options, description, sort_order, created_at, updated_at";

/// Provides CRUD operations for a pack's custom variables.
pub struct PackVariableRepo;

impl PackVariableRepo {
    /// All variables of a pack in display order.
    pub async fn list_by_pack<'e, E>(
        executor: E,
        pack_id: DbId,
    ) -> Result<Vec<PackVariable>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM pack_variables WHERE pack_id = ?1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, PackVariable>(&query)
            .bind(pack_id)
            .fetch_all(executor)
            .await
    }

    /// Find a variable by ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<PackVariable>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM pack_variables WHERE id = ?1");
        sqlx::query_as::<_, PackVariable>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Find a variable of a pack by name.
    pub async fn find_by_name<'e, E>(
        executor: E,
        pack_id: DbId,
        name: &str,
    ) -> Result<Option<PackVariable>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM pack_variables WHERE pack_id = ?1 AND variable_name = ?2"
        );
        sqlx::query_as::<_, PackVariable>(&query)
            .bind(pack_id)
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    /// The sort order that places a new variable after every existing one.
    pub async fn next_sort_order<'e, E>(executor: E, pack_id: DbId) -> Result<i64, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM pack_variables WHERE pack_id = ?1",
        )
        .bind(pack_id)
        .fetch_one(executor)
        .await
    }

    /// Insert a variable, returning the created row.
    pub async fn create<'e, E>(
        executor: E,
        pack_id: DbId,
        def: &VariableDefinition,
        sort_order: i64,
    ) -> Result<PackVariable, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO pack_variables \
                (pack_id, variable_name, display_name, variable_type, is_required, \
                 default_value, enum_options, description, sort_order) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PackVariable>(&query)
            .bind(pack_id)
            .bind(&def.name)
            .bind(&def.display_name)
            .bind(def.variable_type.as_str())
            .bind(def.required)
            .bind(&def.default_value)
            .bind(def.enum_options.clone().map(Json))
            .bind(&def.description)
            .bind(sort_order)
            .fetch_one(executor)
            .await
    }

    /// Overwrite every field of a variable from a full definition.
    pub async fn update<'e, E>(
        executor: E,
        id: DbId,
        def: &VariableDefinition,
        sort_order: i64,
    ) -> Result<Option<PackVariable>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!(
            "UPDATE pack_variables SET \
                variable_name = ?2, \
                display_name = ?3, \
                variable_type = ?4, \
                is_required = ?5, \
                default_value = ?6, \
                enum_options = ?7, \
                description = ?8, \
                sort_order = ?9, \
                updated_at = {NOW} \
             WHERE id = ?1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PackVariable>(&query)
            .bind(id)
            .bind(&def.name)
            .bind(&def.display_name)
            .bind(def.variable_type.as_str())
            .bind(def.required)
            .bind(&def.default_value)
            .bind(def.enum_options.clone().map(Json))
            .bind(&def.description)
            .bind(sort_order)
            .fetch_optional(executor)
            .await
    }

    /// Copy every variable of `source_pack_id` into `target_pack_id`.
    pub async fn copy_from_pack<'e, E>(
        executor: E,
        source_pack_id: DbId,
        target_pack_id: DbId,
    ) -> Result<u64, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query(
            "INSERT INTO pack_variables \
                (pack_id, variable_name, display_name, variable_type, is_required, \
                 default_value, enum_options, description, sort_order) \
             SELECT ?2, variable_name, display_name, variable_type, is_required, \
                 default_value, enum_options, description, sort_order \
             FROM pack_variables WHERE pack_id = ?1",
        )
        .bind(source_pack_id)
        .bind(target_pack_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Hard-delete a variable. Returns `true` if a row was removed.
    pub async fn delete<'e, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM pack_variables WHERE id = ?1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every variable of a pack. Returns the number removed.
    pub async fn delete_by_pack<'e, E>(executor: E, pack_id: DbId) -> Result<u64, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM pack_variables WHERE pack_id = ?1")
            .bind(pack_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
