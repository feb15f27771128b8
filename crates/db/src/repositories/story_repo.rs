//! Repository for the pipeline's view of the `stories` table.

use sqlx::types::Json;
use sqlx::SqliteExecutor;
use taleforge_core::types::DbId;

use super::NOW;
use crate::models::story::{CreateStory, Story, VariableValues};

const COLUMNS: &str = "id, title, genre, mode, pov, tense, protagonist_name, pack_id, \
     custom_variable_values, created_at, updated_at";

/// Provides the story operations the prompt pipeline needs.
pub struct StoryRepo;

impl StoryRepo {
    /// Insert a new story, returning the created row.
    pub async fn create<'e, E>(executor: E, input: &CreateStory) -> Result<Story, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO stories (title, genre, mode, pov, tense, protagonist_name, pack_id) \
             VALUES (?1, ?2, COALESCE(?3, 'adventure'), ?4, ?5, ?6, ?7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Story>(&query)
            .bind(&input.title)
            .bind(&input.genre)
            .bind(&input.mode)
            .bind(&input.pov)
            .bind(&input.tense)
            .bind(&input.protagonist_name)
            .bind(input.pack_id)
            .fetch_one(executor)
            .await
    }

    /// Find a story by ID.
    pub async fn find_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Story>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM stories WHERE id = ?1");
        sqlx::query_as::<_, Story>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Number of stories assigned to a pack.
    pub async fn count_by_pack<'e, E>(executor: E, pack_id: DbId) -> Result<i64, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stories WHERE pack_id = ?1")
            .bind(pack_id)
            .fetch_one(executor)
            .await
    }

    /// Point a story at another pack.
    pub async fn set_pack<'e, E>(
        executor: E,
        story_id: DbId,
        pack_id: DbId,
    ) -> Result<Option<Story>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!(
            "UPDATE stories SET pack_id = ?2, updated_at = {NOW} \
             WHERE id = ?1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Story>(&query)
            .bind(story_id)
            .bind(pack_id)
            .fetch_optional(executor)
            .await
    }

    /// Replace a story's custom variable values.
    pub async fn set_custom_values<'e, E>(
        executor: E,
        story_id: DbId,
        values: &VariableValues,
    ) -> Result<Option<Story>, sqlx::Error>
    where
        E: SqliteExecutor<'e>,
    {
        let query = format!(
            "UPDATE stories SET custom_variable_values = ?2, updated_at = {NOW} \
             WHERE id = ?1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Story>(&query)
            .bind(story_id)
            .bind(Json(values))
            .fetch_optional(executor)
            .await
    }
}
