//! In-memory catalog of named template variables.
//!
//! The registry is the single source of truth the validator consults.
//! Registration is strict: every definition must pass
//! [`validate_definition`], and a duplicate name is an error, never an
//! overwrite, so one variable can never silently shadow another.

use std::collections::BTreeMap;

use crate::error::CoreError;

use super::definition::{validate_definition, VariableCategory, VariableDefinition};
use super::system;

/// Catalog of variable definitions keyed by name.
///
/// Built once by the composition root, then shared read-only (usually behind
/// an `Arc`) by the validator, the pack store and the context builder.
#[derive(Debug, Clone, Default)]
pub struct VariableRegistry {
    variables: BTreeMap<String, VariableDefinition>,
}

impl VariableRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-loaded with the system variables.
    pub fn with_system_variables() -> Self {
        let mut registry = Self::new();
        // Catalog names are unique constants (checked in `system` tests).
        for def in system::system_variables() {
            registry.variables.entry(def.name.clone()).or_insert(def);
        }
        registry
    }

    /// Add a definition. Fails if it is malformed or the name is already
    /// registered.
    pub fn register(&mut self, def: VariableDefinition) -> Result<(), CoreError> {
        validate_definition(&def)?;
        if self.variables.contains_key(&def.name) {
            return Err(CoreError::DuplicateName {
                kind: "variable",
                name: def.name,
            });
        }
        self.variables.insert(def.name.clone(), def);
        Ok(())
    }

    /// Add several definitions, all or nothing.
    ///
    /// Every definition is validated, and every name checked against the
    /// registry and the rest of the batch, before anything is inserted.
    pub fn register_many(
        &mut self,
        defs: impl IntoIterator<Item = VariableDefinition>,
    ) -> Result<(), CoreError> {
        let defs: Vec<VariableDefinition> = defs.into_iter().collect();
        let mut batch = std::collections::HashSet::new();
        for def in &defs {
            validate_definition(def)?;
            if self.variables.contains_key(&def.name) || !batch.insert(def.name.as_str()) {
                return Err(CoreError::DuplicateName {
                    kind: "variable",
                    name: def.name.clone(),
                });
            }
        }
        for def in defs {
            self.variables.insert(def.name.clone(), def);
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&VariableDefinition> {
        self.variables.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// All definitions of one category, ordered by name.
    pub fn get_by_category(&self, category: VariableCategory) -> Vec<&VariableDefinition> {
        self.variables
            .values()
            .filter(|def| def.category == category)
            .collect()
    }

    /// Every registered name, sorted.
    pub fn get_all_names(&self) -> Vec<&str> {
        self.variables.keys().map(String::as_str).collect()
    }

    /// Remove a definition, returning it if it was present.
    pub fn remove(&mut self, name: &str) -> Option<VariableDefinition> {
        self.variables.remove(name)
    }

    pub fn clear(&mut self) {
        self.variables.clear();
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
