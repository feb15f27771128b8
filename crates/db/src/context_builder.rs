//! Renders one template for one story.
//!
//! ```ignore
//! let prompt = ContextBuilder::for_story(&store, story_id)
//!     .add([("userAction", "open the door")])
//!     .render("story-turn")
//!     .await?;
//! ```

use taleforge_core::context::{
    pack_defaults_layer, story_overrides_layer, ContextLayers, ContextValue, RenderContext,
};
use taleforge_core::error::CoreError;
use taleforge_core::shipped;
use taleforge_core::types::DbId;
use taleforge_core::variables::system::system_context;

use crate::error::StoreResult;
use crate::models::pack_variable::to_definitions;
use crate::models::story::Story;
use crate::repositories::{PackTemplateRepo, PackVariableRepo};
use crate::store::PackStore;

/// Assembles a render context and renders a template with it.
///
/// Precedence, later wins: system variables, pack custom-variable defaults,
/// per-story override values, runtime values passed to [`ContextBuilder::add`].
pub struct ContextBuilder<'a> {
    store: &'a PackStore,
    story_id: Option<DbId>,
    runtime: RenderContext,
}

impl<'a> ContextBuilder<'a> {
    /// A builder with no story: uses the default pack and system defaults.
    pub fn new(store: &'a PackStore) -> Self {
        Self {
            store,
            story_id: None,
            runtime: RenderContext::new(),
        }
    }

    /// A builder for a story: uses the story's pack, fields and overrides.
    pub fn for_story(store: &'a PackStore, story_id: DbId) -> Self {
        Self {
            story_id: Some(story_id),
            ..Self::new(store)
        }
    }

    /// Merge runtime values. Calls apply in order; the last write of a name wins.
    pub fn add<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<ContextValue>,
    {
        for (name, value) in values {
            self.runtime.insert(name.as_ref(), value);
        }
        self
    }

    /// Merge a whole context of runtime values.
    pub fn add_context(mut self, values: &RenderContext) -> Self {
        self.runtime.merge(values);
        self
    }

    /// The fully merged context [`ContextBuilder::render`] would use.
    pub async fn build_context(&self) -> StoreResult<RenderContext> {
        let (story, pack_id) = self.resolve_pack().await?;
        self.context_for(story.as_ref(), pack_id).await
    }

    /// Render `template_id` from the resolved pack.
    ///
    /// A template missing from the story's pack is taken from the default
    /// pack, then from the shipped catalog. External templates are returned
    /// unrendered.
    pub async fn render(&self, template_id: &str) -> StoreResult<String> {
        let (story, pack_id) = self.resolve_pack().await?;
        let content = self.load_content(pack_id, template_id).await?;
        if shipped::is_external(template_id) {
            return Ok(content);
        }
        let context = self.context_for(story.as_ref(), pack_id).await?;
        Ok(self.store.engine().render(&content, &context))
    }

    async fn resolve_pack(&self) -> StoreResult<(Option<Story>, DbId)> {
        match self.story_id {
            Some(story_id) => {
                let story = self.store.get_story(story_id).await?;
                let pack_id = story.pack_id;
                Ok((Some(story), pack_id))
            }
            None => Ok((None, self.store.get_default_pack().await?.id)),
        }
    }

    async fn load_content(&self, pack_id: DbId, template_id: &str) -> StoreResult<String> {
        let pool = self.store.pool();
        if let Some(template) = PackTemplateRepo::find(pool, pack_id, template_id).await? {
            return Ok(template.content);
        }

        let default = self.store.get_default_pack().await?;
        if default.id != pack_id {
            if let Some(template) = PackTemplateRepo::find(pool, default.id, template_id).await? {
                tracing::warn!(
                    pack_id,
                    template_id,
                    "Template missing from pack; using the default pack's content"
                );
                return Ok(template.content);
            }
        }

        match shipped::find(template_id) {
            Some(template) => {
                tracing::warn!(
                    pack_id,
                    template_id,
                    "Template missing from the default pack; using shipped content"
                );
                Ok(template.content.to_string())
            }
            None => Err(CoreError::NotFound {
                entity: "template",
                key: template_id.to_string(),
            }
            .into()),
        }
    }

    async fn context_for(&self, story: Option<&Story>, pack_id: DbId) -> StoreResult<RenderContext> {
        let rows = PackVariableRepo::list_by_pack(self.store.pool(), pack_id).await?;
        let variables = to_definitions(&rows)?;
        let facts = story.map(Story::facts);

        let layers = ContextLayers {
            system: system_context(self.store.registry(), facts.as_ref()),
            pack_defaults: pack_defaults_layer(&variables),
            story_overrides: match story {
                Some(story) => story_overrides_layer(&variables, &story.custom_variable_values.0),
                None => RenderContext::new(),
            },
            runtime: self.runtime.clone(),
        };
        Ok(layers.resolve())
    }
}
