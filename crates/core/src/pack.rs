//! Preset pack rules: naming, drift status and name de-duplication.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/* --------------------------------------------------------------------------
   Constants
   -------------------------------------------------------------------------- */

/// Name of the seeded baseline pack.
pub const DEFAULT_PACK_NAME: &str = "Default";

/// Description of the seeded baseline pack.
pub const DEFAULT_PACK_DESCRIPTION: &str = "Shipped templates and variables.";

/// Maximum length for a pack name.
pub const MAX_PACK_NAME_LEN: usize = 200;

/// Maximum length for a pack description or author.
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/* --------------------------------------------------------------------------
   Validation
   -------------------------------------------------------------------------- */

/// Validate a pack name: non-blank and within the length limit.
pub fn validate_pack_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Pack name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_PACK_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Pack name too long: {} chars (max {MAX_PACK_NAME_LEN})",
            name.chars().count()
        )));
    }
    Ok(())
}

/// Validate an optional free-text field (description, author).
pub fn validate_description(field: &str, value: Option<&str>) -> Result<(), CoreError> {
    match value {
        Some(v) if v.chars().count() > MAX_DESCRIPTION_LEN => Err(CoreError::Validation(
            format!("{field} too long: {} chars (max {MAX_DESCRIPTION_LEN})", v.chars().count()),
        )),
        _ => Ok(()),
    }
}

/* --------------------------------------------------------------------------
   Drift status
   -------------------------------------------------------------------------- */

/// Whether a pack template still matches the default pack's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStatus {
    Unmodified,
    Modified,
}

impl TemplateStatus {
    /// Compare a pack template's hash against the default pack's hash for the
    /// same template id. A template the default pack does not have counts as
    /// modified.
    pub fn from_hashes(pack_hash: &str, default_hash: Option<&str>) -> Self {
        match default_hash {
            Some(default) if default == pack_hash => TemplateStatus::Unmodified,
            _ => TemplateStatus::Modified,
        }
    }

    pub fn is_modified(self) -> bool {
        self == TemplateStatus::Modified
    }
}

/* --------------------------------------------------------------------------
   Naming
   -------------------------------------------------------------------------- */

/// Return `base` if no existing name equals it, otherwise the first of
/// `"base (2)"`, `"base (3)"`, ... that is free.
pub fn unique_pack_name<S: AsRef<str>>(base: &str, existing: &[S]) -> String {
    let taken = |candidate: &str| existing.iter().any(|e| e.as_ref() == candidate);
    if !taken(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{base} ({n})"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn pack_name_rules() {
        assert!(validate_pack_name("Noir").is_ok());
        assert_matches!(validate_pack_name("   "), Err(CoreError::Validation(_)));
        assert_matches!(
            validate_pack_name(&"x".repeat(MAX_PACK_NAME_LEN + 1)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn description_limit() {
        assert!(validate_description("Description", None).is_ok());
        assert!(validate_description("Author", Some("me")).is_ok());
        assert_matches!(
            validate_description("Author", Some(&"a".repeat(MAX_DESCRIPTION_LEN + 1))),
            Err(CoreError::Validation(msg)) if msg.starts_with("Author")
        );
    }

    #[test]
    fn status_from_hashes() {
        assert_eq!(TemplateStatus::from_hashes("abc", Some("abc")), TemplateStatus::Unmodified);
        assert_eq!(TemplateStatus::from_hashes("abc", Some("def")), TemplateStatus::Modified);
        assert!(TemplateStatus::from_hashes("abc", None).is_modified());
    }

    #[test]
    fn unique_name_suffixes() {
        let existing = ["Default", "Noir", "Noir (2)"];
        assert_eq!(unique_pack_name("Pulp", &existing), "Pulp");
        assert_eq!(unique_pack_name("Default", &existing), "Default (2)");
        assert_eq!(unique_pack_name("Noir", &existing), "Noir (3)");
    }
}
