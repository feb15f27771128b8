//! Flat render contexts and the precedence rules that build them.
//!
//! A [`RenderContext`] maps variable names to concrete scalar values (or flat
//! lists of scalars, for loops). Values are resolved before they reach the
//! engine, so a value can never contain template syntax that gets expanded
//! again.
//!
//! Layers are merged in a fixed order, later layers winning per key:
//!
//! 1. system variables (always present)
//! 2. custom-variable defaults of the pack
//! 3. per-story override values
//! 4. runtime variables added by the calling service

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::variables::definition::{parse_bool, validate_value};
use crate::variables::{VariableDefinition, VariableType};

/* --------------------------------------------------------------------------
   Values
   -------------------------------------------------------------------------- */

/// A single resolved context value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    List(Vec<ContextValue>),
}

impl ContextValue {
    /// Coerce a stored string value according to a declared variable type.
    ///
    /// Numbers that fail to parse and booleans with unknown spellings fall
    /// back to text rather than being dropped.
    pub fn coerce(raw: &str, variable_type: VariableType) -> Self {
        match variable_type {
            VariableType::Number => {
                let trimmed = raw.trim();
                if let Ok(int) = trimmed.parse::<i64>() {
                    ContextValue::Integer(int)
                } else if let Ok(float) = trimmed.parse::<f64>() {
                    ContextValue::Number(float)
                } else {
                    ContextValue::Text(raw.to_string())
                }
            }
            VariableType::Boolean => match parse_bool(raw) {
                Some(b) => ContextValue::Bool(b),
                None => ContextValue::Text(raw.to_string()),
            },
            VariableType::Text | VariableType::Textarea | VariableType::Enum => {
                ContextValue::Text(raw.to_string())
            }
        }
    }

    /// Convert a JSON override value. Objects and nulls have no flat
    /// representation and yield `None`.
    pub fn from_json(value: &serde_json::Value, variable_type: Option<VariableType>) -> Option<Self> {
        match value {
            serde_json::Value::Null | serde_json::Value::Object(_) => None,
            serde_json::Value::Bool(b) => Some(ContextValue::Bool(*b)),
            serde_json::Value::Number(n) => Some(match n.as_i64() {
                Some(i) => ContextValue::Integer(i),
                None => ContextValue::Number(n.as_f64().unwrap_or_default()),
            }),
            serde_json::Value::String(s) => Some(match variable_type {
                Some(ty) => ContextValue::coerce(s, ty),
                None => ContextValue::Text(s.clone()),
            }),
            serde_json::Value::Array(items) => Some(ContextValue::List(
                items
                    .iter()
                    .filter_map(|item| match item {
                        serde_json::Value::Array(_) => None,
                        other => ContextValue::from_json(other, None),
                    })
                    .collect(),
            )),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::Text(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::Text(value)
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        ContextValue::Bool(value)
    }
}

impl From<i64> for ContextValue {
    fn from(value: i64) -> Self {
        ContextValue::Integer(value)
    }
}

impl From<i32> for ContextValue {
    fn from(value: i32) -> Self {
        ContextValue::Integer(i64::from(value))
    }
}

impl From<f64> for ContextValue {
    fn from(value: f64) -> Self {
        ContextValue::Number(value)
    }
}

impl<T: Into<ContextValue>> From<Vec<T>> for ContextValue {
    fn from(values: Vec<T>) -> Self {
        ContextValue::List(values.into_iter().map(Into::into).collect())
    }
}

/* --------------------------------------------------------------------------
   Context
   -------------------------------------------------------------------------- */

/// Flat `name -> value` mapping handed to the template engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderContext {
    values: BTreeMap<String, ContextValue>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any previous value for the same name.
    pub fn insert(&mut self, name: &str, value: impl Into<ContextValue>) {
        self.values.insert(name.to_string(), value.into());
    }

    /// Builder-style [`RenderContext::insert`].
    pub fn with(mut self, name: &str, value: impl Into<ContextValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Merge another context on top of this one; `other` wins per key.
    pub fn merge(&mut self, other: &RenderContext) {
        for (name, value) in &other.values {
            self.values.insert(name.clone(), value.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&ContextValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<ContextValue>> FromIterator<(K, V)> for RenderContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/* --------------------------------------------------------------------------
   Layer assembly
   -------------------------------------------------------------------------- */

/// Custom-variable defaults of a pack as a context layer.
pub fn pack_defaults_layer(variables: &[VariableDefinition]) -> RenderContext {
    let mut layer = RenderContext::new();
    for def in variables {
        if let Some(default) = def.default_value.as_deref() {
            layer.insert(&def.name, ContextValue::coerce(default, def.variable_type));
        }
    }
    layer
}

/// Per-story override values as a context layer.
///
/// String values are coerced by the declared type of the matching pack
/// variable; names the pack does not declare are still passed through as
/// plain values.
pub fn story_overrides_layer(
    variables: &[VariableDefinition],
    overrides: &serde_json::Map<String, serde_json::Value>,
) -> RenderContext {
    let mut layer = RenderContext::new();
    for (name, raw) in overrides {
        let declared = variables
            .iter()
            .find(|def| &def.name == name)
            .map(|def| def.variable_type);
        match ContextValue::from_json(raw, declared) {
            Some(value) => layer.insert(name, value),
            None => tracing::debug!(variable = %name, "Skipping non-scalar story override"),
        }
    }
    layer
}

/// Check per-story override values against the pack's custom variables.
///
/// Every key must name a declared variable and every value must be a scalar
/// acceptable for that variable's type. JSON numbers and booleans are checked
/// through their string form.
pub fn validate_story_overrides(
    variables: &[VariableDefinition],
    overrides: &serde_json::Map<String, serde_json::Value>,
) -> Result<(), CoreError> {
    for (name, value) in overrides {
        let Some(def) = variables.iter().find(|def| &def.name == name) else {
            return Err(CoreError::Validation(format!(
                "'{name}' is not a custom variable of this pack"
            )));
        };
        let raw = match value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            _ => {
                return Err(CoreError::Validation(format!(
                    "Value for '{name}' must be text, a number or true/false"
                )))
            }
        };
        validate_value(def, &raw)?;
    }
    Ok(())
}

/// The four context layers, merged in precedence order by [`ContextLayers::resolve`].
#[derive(Debug, Clone, Default)]
pub struct ContextLayers {
    pub system: RenderContext,
    pub pack_defaults: RenderContext,
    pub story_overrides: RenderContext,
    pub runtime: RenderContext,
}

impl ContextLayers {
    /// Flatten the layers: system, then pack defaults, then story overrides,
    /// then runtime values.
    pub fn resolve(&self) -> RenderContext {
        let mut context = self.system.clone();
        context.merge(&self.pack_defaults);
        context.merge(&self.story_overrides);
        context.merge(&self.runtime);
        context
    }
}
