//! Variable definition types and definition-level validation.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/* --------------------------------------------------------------------------
   Limits
   -------------------------------------------------------------------------- */

/// Maximum length of a variable name.
pub const MAX_VARIABLE_NAME_LEN: usize = 64;

/// Maximum length of a variable display name.
pub const MAX_DISPLAY_NAME_LEN: usize = 120;

/// Names the template language reserves for itself.
const RESERVED_NAMES: &[&str] = &[
    "and", "or", "not", "in", "is", "if", "elif", "elsif", "else", "endif", "for", "endfor",
    "set", "true", "false", "none", "True", "False", "None", "loop",
];

/* --------------------------------------------------------------------------
   Enumerations
   -------------------------------------------------------------------------- */

/// Declared value type of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    Text,
    Textarea,
    Enum,
    Number,
    Boolean,
}

impl VariableType {
    pub const ALL: [VariableType; 5] = [
        VariableType::Text,
        VariableType::Textarea,
        VariableType::Enum,
        VariableType::Number,
        VariableType::Boolean,
    ];

    /// The value stored in `pack_variables.variable_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Enum => "enum",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariableType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VariableType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid variable type '{s}'. Must be one of: text, textarea, enum, number, boolean"
                ))
            })
    }
}

/// Where a variable's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableCategory {
    /// Filled automatically from the story record; registered at startup.
    System,
    /// Injected by the calling service for a single render.
    Runtime,
    /// Defined by the user on a preset pack.
    Custom,
}

/// One selectable option of an [`VariableType::Enum`] variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumOption {
    pub label: String,
    pub value: String,
}

impl EnumOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/* --------------------------------------------------------------------------
   Definition
   -------------------------------------------------------------------------- */

/// A named template variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDefinition {
    /// Key used inside templates, e.g. `protagonistName`.
    pub name: String,
    pub display_name: String,
    pub variable_type: VariableType,
    pub category: VariableCategory,
    pub required: bool,
    pub default_value: Option<String>,
    pub enum_options: Option<Vec<EnumOption>>,
    pub description: Option<String>,
}

impl VariableDefinition {
    /// A plain text variable with no default.
    pub fn text(name: &str, display_name: &str, category: VariableCategory) -> Self {
        Self {
            name: name.to_string(),
            display_name: display_name.to_string(),
            variable_type: VariableType::Text,
            category,
            required: false,
            default_value: None,
            enum_options: None,
            description: None,
        }
    }

    pub fn with_type(mut self, variable_type: VariableType) -> Self {
        self.variable_type = variable_type;
        self
    }

    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    pub fn with_options(mut self, options: Vec<EnumOption>) -> Self {
        self.variable_type = VariableType::Enum;
        self.enum_options = Some(options);
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/* --------------------------------------------------------------------------
   Validation
   -------------------------------------------------------------------------- */

/// Whether `name` can be referenced as `{{ name }}` in a template.
///
/// Must start with an ASCII letter or underscore, continue with ASCII
/// alphanumerics or underscores, and must not be a reserved word.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return false;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return false;
    }
    !RESERVED_NAMES.contains(&name)
}

/// Validate a variable definition.
///
/// Checks the name, the display name, the enum options (non-empty, unique
/// values) and that any default value fits the declared type.
pub fn validate_definition(def: &VariableDefinition) -> Result<(), CoreError> {
    if !is_valid_identifier(&def.name) {
        return Err(CoreError::Validation(format!(
            "Variable name '{}' is not valid. Use letters, digits and underscores, starting with a letter",
            def.name
        )));
    }
    if def.name.len() > MAX_VARIABLE_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Variable name too long: {} chars (max {MAX_VARIABLE_NAME_LEN})",
            def.name.len()
        )));
    }
    if def.display_name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Variable display name must not be empty".to_string(),
        ));
    }
    if def.display_name.len() > MAX_DISPLAY_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Variable display name too long: {} chars (max {MAX_DISPLAY_NAME_LEN})",
            def.display_name.len()
        )));
    }

    match def.variable_type {
        VariableType::Enum => validate_enum_options(def)?,
        _ if def.enum_options.as_ref().is_some_and(|o| !o.is_empty()) => {
            return Err(CoreError::Validation(format!(
                "Only enum variables may define options ('{}' is {})",
                def.name, def.variable_type
            )));
        }
        _ => {}
    }

    if let Some(default) = def.default_value.as_deref() {
        validate_value(def, default)?;
    }
    Ok(())
}

fn validate_enum_options(def: &VariableDefinition) -> Result<(), CoreError> {
    let options = def.enum_options.as_deref().unwrap_or_default();
    if options.is_empty() {
        return Err(CoreError::Validation(format!(
            "Enum variable '{}' must have at least one option",
            def.name
        )));
    }
    let mut seen = HashSet::new();
    for option in options {
        if option.value.is_empty() {
            return Err(CoreError::Validation(format!(
                "Enum variable '{}' has an option with an empty value",
                def.name
            )));
        }
        if !seen.insert(option.value.as_str()) {
            return Err(CoreError::Validation(format!(
                "Enum variable '{}' has duplicate option value '{}'",
                def.name, option.value
            )));
        }
    }
    Ok(())
}

/// Check that a raw string value is acceptable for the definition's type.
pub fn validate_value(def: &VariableDefinition, value: &str) -> Result<(), CoreError> {
    match def.variable_type {
        VariableType::Number => {
            if value.trim().parse::<f64>().is_err() {
                return Err(CoreError::Validation(format!(
                    "Value '{value}' for '{}' is not a number",
                    def.name
                )));
            }
        }
        VariableType::Boolean => {
            if parse_bool(value).is_none() {
                return Err(CoreError::Validation(format!(
                    "Value '{value}' for '{}' must be true or false",
                    def.name
                )));
            }
        }
        VariableType::Enum => {
            let options = def.enum_options.as_deref().unwrap_or_default();
            if !options.iter().any(|o| o.value == value) {
                return Err(CoreError::Validation(format!(
                    "Value '{value}' is not one of the options of '{}'",
                    def.name
                )));
            }
        }
        VariableType::Text | VariableType::Textarea => {}
    }
    Ok(())
}

/// Lenient boolean parsing shared by validation and context coercion.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
