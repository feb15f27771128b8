//! Variable definitions, the in-memory variable registry and the catalog of
//! system variables.

pub mod definition;
pub mod registry;
pub mod system;

pub use definition::{
    is_valid_identifier, validate_definition, EnumOption, VariableCategory, VariableDefinition,
    VariableType,
};
pub use registry::VariableRegistry;
