//! Portable pack export/import format.
//!
//! A pack is exported as a versioned JSON envelope carrying its metadata,
//! every template and every custom variable. Hashes travel with the export
//! for reference only; import recomputes them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::pack::validate_pack_name;
use crate::types::Timestamp;
use crate::variables::{validate_definition, VariableCategory, VariableDefinition};

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Current envelope version. Imports of any other version are rejected.
pub const FORMAT_VERSION: u32 = 1;

/// A portable snapshot of one preset pack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackExport {
    pub format_version: u32,
    pub exported_at: Timestamp,
    pub pack: ExportedPack,
    pub templates: Vec<ExportedTemplate>,
    #[serde(default)]
    pub variables: Vec<ExportedVariable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedPack {
    pub name: String,
    pub description: Option<String>,
    pub author: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedTemplate {
    pub template_id: String,
    pub content: String,
    #[serde(default)]
    pub content_hash: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedVariable {
    #[serde(flatten)]
    pub definition: VariableDefinition,
    #[serde(default)]
    pub sort_order: i64,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Structural checks on an envelope before anything is written.
///
/// Template *content* is checked separately by the store, which owns the
/// validator and knows which templates are external.
pub fn validate_import(export: &PackExport) -> Result<(), CoreError> {
    if export.format_version != FORMAT_VERSION {
        return Err(CoreError::Validation(format!(
            "Unsupported pack format version {} (expected {FORMAT_VERSION})",
            export.format_version
        )));
    }
    validate_pack_name(&export.pack.name)?;

    let mut template_ids = HashSet::new();
    for template in &export.templates {
        if template.template_id.trim().is_empty() {
            return Err(CoreError::Validation(
                "Exported template has an empty template id".to_string(),
            ));
        }
        if !template_ids.insert(template.template_id.as_str()) {
            return Err(CoreError::Validation(format!(
                "Template '{}' appears more than once",
                template.template_id
            )));
        }
    }

    let mut names = HashSet::new();
    for variable in &export.variables {
        let def = &variable.definition;
        if def.category != VariableCategory::Custom {
            return Err(CoreError::Validation(format!(
                "Variable '{}' must be a custom variable",
                def.name
            )));
        }
        validate_definition(def)?;
        if !names.insert(def.name.as_str()) {
            return Err(CoreError::DuplicateName {
                kind: "variable",
                name: def.name.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;
    use crate::variables::VariableType;

    fn envelope() -> PackExport {
        PackExport {
            format_version: FORMAT_VERSION,
            exported_at: Utc::now(),
            pack: ExportedPack {
                name: "Noir".to_string(),
                description: Some("Rain and regret".to_string()),
                author: None,
            },
            templates: vec![ExportedTemplate {
                template_id: "story-turn".to_string(),
                content: "{{ userAction }}".to_string(),
                content_hash: None,
            }],
            variables: vec![ExportedVariable {
                definition: VariableDefinition::text("city", "City", VariableCategory::Custom)
                    .with_default("Los Angeles"),
                sort_order: 0,
            }],
        }
    }

    #[test]
    fn valid_envelope_passes() {
        assert!(validate_import(&envelope()).is_ok());
    }

    #[test]
    fn wrong_version_is_rejected() {
        let mut export = envelope();
        export.format_version = 99;
        assert_matches!(validate_import(&export), Err(CoreError::Validation(_)));
    }

    #[test]
    fn duplicate_template_ids_are_rejected() {
        let mut export = envelope();
        export.templates.push(export.templates[0].clone());
        assert_matches!(validate_import(&export), Err(CoreError::Validation(msg)) if msg.contains("story-turn"));
    }

    #[test]
    fn duplicate_variables_are_rejected() {
        let mut export = envelope();
        export.variables.push(export.variables[0].clone());
        assert_matches!(
            validate_import(&export),
            Err(CoreError::DuplicateName { name, .. }) if name == "city"
        );
    }

    #[test]
    fn invalid_variable_definition_is_rejected() {
        let mut export = envelope();
        export.variables[0].definition = export.variables[0]
            .definition
            .clone()
            .with_type(VariableType::Number);
        assert_matches!(validate_import(&export), Err(CoreError::Validation(_)));
    }

    #[test]
    fn envelope_survives_json() {
        let json = serde_json::to_string(&envelope()).unwrap();
        let parsed: PackExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.pack.name, "Noir");
        assert_eq!(parsed.variables[0].definition.name, "city");
        assert_eq!(parsed.variables[0].definition.default_value.as_deref(), Some("Los Angeles"));
    }
}
