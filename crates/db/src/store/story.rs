//! Story-side operations: pack assignment and per-story override values.

use taleforge_core::context::validate_story_overrides;
use taleforge_core::error::CoreError;
use taleforge_core::types::DbId;

use super::PackStore;
use crate::error::StoreResult;
use crate::models::pack_variable::to_definitions;
use crate::models::story::{Story, VariableValues};
use crate::repositories::{PackVariableRepo, StoryRepo};

impl PackStore {
    pub async fn get_story(&self, story_id: DbId) -> StoreResult<Story> {
        StoryRepo::find_by_id(&self.pool, story_id)
            .await?
            .ok_or_else(|| CoreError::not_found("story", story_id).into())
    }

    /// Point a story at a pack.
    ///
    /// Override values for variables the new pack does not declare are kept;
    /// they are ignored at render time and dropped on the next
    /// [`PackStore::set_story_variable_values`].
    pub async fn assign_pack_to_story(&self, story_id: DbId, pack_id: DbId) -> StoreResult<Story> {
        self.require_pack(pack_id).await?;
        self.get_story(story_id).await?;

        let mut tx = self.pool.begin().await?;
        let story = StoryRepo::set_pack(&mut *tx, story_id, pack_id)
            .await?
            .ok_or_else(|| CoreError::not_found("story", story_id))?;
        tx.commit().await?;

        tracing::info!(story_id, pack_id, "Assigned pack to story");
        Ok(story)
    }

    pub async fn get_story_variable_values(&self, story_id: DbId) -> StoreResult<VariableValues> {
        Ok(self.get_story(story_id).await?.custom_variable_values.0)
    }

    /// Replace a story's override values after checking them against the
    /// custom variables of the story's pack.
    pub async fn set_story_variable_values(
        &self,
        story_id: DbId,
        values: &VariableValues,
    ) -> StoreResult<VariableValues> {
        let story = self.get_story(story_id).await?;
        let rows = PackVariableRepo::list_by_pack(&self.pool, story.pack_id).await?;
        validate_story_overrides(&to_definitions(&rows)?, values)?;

        let mut tx = self.pool.begin().await?;
        let story = StoryRepo::set_custom_values(&mut *tx, story_id, values)
            .await?
            .ok_or_else(|| CoreError::not_found("story", story_id))?;
        tx.commit().await?;

        tracing::info!(story_id, count = values.len(), "Saved story variable values");
        Ok(story.custom_variable_values.0)
    }
}
