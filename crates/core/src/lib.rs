//! `taleforge-core` library crate.
//!
//! Pure domain logic for the prompt context pipeline: the template engine,
//! the variable registry, the template validator, render-context assembly,
//! content hashing and the shipped template catalog. Nothing in this crate
//! touches the database.

pub mod context;
pub mod error;
pub mod exchange;
pub mod hashing;
pub mod pack;
pub mod shipped;
pub mod template;
pub mod types;
pub mod validation;
pub mod variables;

pub use context::{ContextValue, RenderContext};
pub use error::CoreError;
pub use template::TemplateEngine;
pub use validation::{TemplateValidator, ValidationError, ValidationErrorKind, ValidationResult};
pub use variables::{VariableCategory, VariableDefinition, VariableRegistry, VariableType};
