use crate::types::DbId;
use crate::validation::ValidationResult;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} '{key}'")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate {kind} name: '{name}'")]
    DuplicateName { kind: &'static str, name: String },

    #[error("Pack {pack_id} is assigned to {story_count} story(ies) and cannot be deleted")]
    PackInUse { pack_id: DbId, story_count: i64 },

    #[error("The default pack cannot be deleted")]
    CannotDeleteDefault,

    #[error("Nothing to reset: {0}")]
    NothingToReset(String),

    #[error("Template '{template_id}' failed validation with {} error(s)", .result.errors.len())]
    InvalidTemplate {
        template_id: String,
        result: ValidationResult,
    },
}

impl CoreError {
    /// Shorthand for a [`CoreError::NotFound`] keyed by a numeric id.
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        CoreError::NotFound {
            entity,
            key: id.to_string(),
        }
    }
}
