//! Custom variable model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use taleforge_core::error::CoreError;
use taleforge_core::types::{DbId, Timestamp};
use taleforge_core::variables::{EnumOption, VariableCategory, VariableDefinition, VariableType};

/// A row from the `pack_variables` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PackVariable {
    pub id: DbId,
    pub pack_id: DbId,
    pub variable_name: String,
    pub display_name: String,
    /// One of `text`, `textarea`, `enum`, `number`, `boolean`.
    pub variable_type: String,
    pub is_required: bool,
    pub default_value: Option<String>,
    pub enum_options: Option<Json<Vec<EnumOption>>>,
    pub description: Option<String>,
    pub sort_order: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PackVariable {
    /// The stored row as a custom [`VariableDefinition`].
    pub fn to_definition(&self) -> Result<VariableDefinition, CoreError> {
        Ok(VariableDefinition {
            name: self.variable_name.clone(),
            display_name: self.display_name.clone(),
            variable_type: self.variable_type.parse()?,
            category: VariableCategory::Custom,
            required: self.is_required,
            default_value: self.default_value.clone(),
            enum_options: self.enum_options.as_ref().map(|options| options.0.clone()),
            description: self.description.clone(),
        })
    }
}

/// Convert a list of rows, failing on the first corrupt type value.
pub fn to_definitions(rows: &[PackVariable]) -> Result<Vec<VariableDefinition>, CoreError> {
    rows.iter().map(PackVariable::to_definition).collect()
}

/// DTO for creating a custom variable.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePackVariable {
    pub variable_name: String,
    pub display_name: String,
    pub variable_type: VariableType,
    #[serde(default)]
    pub is_required: bool,
    pub default_value: Option<String>,
    pub enum_options: Option<Vec<EnumOption>>,
    pub description: Option<String>,
    /// Defaults to after the last existing variable.
    pub sort_order: Option<i64>,
}

impl CreatePackVariable {
    pub fn to_definition(&self) -> VariableDefinition {
        VariableDefinition {
            name: self.variable_name.clone(),
            display_name: self.display_name.clone(),
            variable_type: self.variable_type,
            category: VariableCategory::Custom,
            required: self.is_required,
            default_value: self.default_value.clone(),
            enum_options: self.enum_options.clone(),
            description: self.description.clone(),
        }
    }
}

/// DTO for updating a custom variable. All fields are optional.
///
/// For the nullable columns an outer `Some(None)` clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePackVariable {
    pub variable_name: Option<String>,
    pub display_name: Option<String>,
    pub variable_type: Option<VariableType>,
    pub is_required: Option<bool>,
    pub default_value: Option<Option<String>>,
    pub enum_options: Option<Option<Vec<EnumOption>>>,
    pub description: Option<Option<String>>,
    pub sort_order: Option<i64>,
}

impl UpdatePackVariable {
    /// Apply the patch to an existing definition.
    pub fn apply(&self, mut def: VariableDefinition) -> VariableDefinition {
        if let Some(name) = &self.variable_name {
            def.name = name.clone();
        }
        if let Some(display_name) = &self.display_name {
            def.display_name = display_name.clone();
        }
        if let Some(variable_type) = self.variable_type {
            def.variable_type = variable_type;
        }
        if let Some(required) = self.is_required {
            def.required = required;
        }
        if let Some(default_value) = &self.default_value {
            def.default_value = default_value.clone();
        }
        if let Some(enum_options) = &self.enum_options {
            def.enum_options = enum_options.clone();
        }
        if let Some(description) = &self.description {
            def.description = description.clone();
        }
        def
    }
}
