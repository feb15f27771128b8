//! Repository for the `pack_templates` table.

use sqlx::SqliteExecutor;
use taleforge_core::types::DbId;

use super::NOW;
use crate::models::pack_template::PackTemplate;

const COLUMNS: &str = "id, pack_id, template_id, content, content_hash, created_at, updated_at";

/// Provides CRUD operations for pack templates.
pub struct PackTemplateRepo;

impl PackTemplateRepo {
    /// All templates of a pack, ordered by template id.
    pub async fn list_by_pack<'e, E>(
        executor: E,
        pack_id: DbId,
    ) -> Result<Vec<PackTemplate>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM pack_templates WHERE pack_id = ?1 ORDER BY template_id"
        );
        sqlx::query_as::<_, PackTemplate>(&query)
            .bind(pack_id)
            .fetch_all(executor)
            .await
    }

    /// One template of a pack.
    pub async fn find<'e, E>(
        executor: E,
        pack_id: DbId,
        template_id: &str,
    ) -> Result<Option<PackTemplate>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM pack_templates WHERE pack_id = ?1 AND template_id = ?2"
        );
        sqlx::query_as::<_, PackTemplate>(&query)
            .bind(pack_id)
            .bind(template_id)
            .fetch_optional(executor)
            .await
    }

    /// Insert or replace the content of `(pack_id, template_id)`.
    ///
    /// An existing row keeps its `id` and `created_at`.
    pub async fn upsert<'e, E>(
        executor: E,
        pack_id: DbId,
        template_id: &str,
        content: &str,
        content_hash: &str,
    ) -> Result<PackTemplate, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO pack_templates (pack_id, template_id, content, content_hash) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT (pack_id, template_id) DO UPDATE SET \
                content = excluded.content, \
                content_hash = excluded.content_hash, \
                updated_at = {NOW} \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PackTemplate>(&query)
            .bind(pack_id)
            .bind(template_id)
            .bind(content)
            .bind(content_hash)
            .fetch_one(executor)
            .await
    }

    /// Copy every template of `source_pack_id` into `target_pack_id`.
    /// Returns the number of rows inserted.
    pub async fn copy_from_pack<'e, E>(
        executor: E,
        source_pack_id: DbId,
        target_pack_id: DbId,
    ) -> Result<u64, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query(
            "INSERT INTO pack_templates (pack_id, template_id, content, content_hash) \
             SELECT ?2, template_id, content, content_hash \
             FROM pack_templates WHERE pack_id = ?1",
        )
        .bind(source_pack_id)
        .bind(target_pack_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete every template of a pack. Returns the number removed.
    pub async fn delete_by_pack<'e, E>(executor: E, pack_id: DbId) -> Result<u64, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM pack_templates WHERE pack_id = ?1")
            .bind(pack_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
