//! Template validation.
//!
//! [`TemplateValidator::validate`] is the gate every save path calls. It is a
//! pure function of its inputs (no I/O, no state) and cheap enough to run on
//! every keystroke. Stages, short-circuiting on syntax:
//!
//! 1. grammar check; a failure returns exactly one `Syntax` error
//! 2. every referenced variable must be registered or passed as additional
//! 3. every applied filter must be in the filter library

pub mod messages;
pub mod result;
pub mod suggest;

use std::collections::BTreeSet;
use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::template::filters::{is_known_filter, KNOWN_FILTERS};
use crate::template::scan::{self, line_col};
use crate::template::{ParseError, TemplateEngine};
use crate::variables::VariableRegistry;

pub use messages::{simplify_message, GENERIC_SYNTAX_MESSAGE};
pub use result::{ValidationError, ValidationErrorKind, ValidationResult};
pub use suggest::{closest_match, levenshtein, MAX_SUGGESTION_DISTANCE};

/// Validates templates against a registry and the filter library.
#[derive(Clone, Copy)]
pub struct TemplateValidator<'a> {
    engine: &'a TemplateEngine,
    registry: &'a VariableRegistry,
}

impl<'a> TemplateValidator<'a> {
    pub fn new(engine: &'a TemplateEngine, registry: &'a VariableRegistry) -> Self {
        Self { engine, registry }
    }

    /// Validate `template`. Names in `additional_variables` are accepted as
    /// known in addition to the registry (pack custom variables, runtime
    /// variables of the template being edited).
    ///
    /// Never fails: an internal fault becomes a single generic syntax error.
    pub fn validate(&self, template: &str, additional_variables: &[String]) -> ValidationResult {
        match catch_unwind(AssertUnwindSafe(|| self.run_stages(template, additional_variables))) {
            Ok(result) => result,
            Err(_) => {
                tracing::error!("Template validation panicked; reporting a generic syntax error");
                ValidationResult::from_errors(vec![ValidationError {
                    kind: ValidationErrorKind::Syntax,
                    message: GENERIC_SYNTAX_MESSAGE.to_string(),
                    name: None,
                    suggestion: None,
                    line: None,
                    column: None,
                }])
            }
        }
    }

    fn run_stages(&self, template: &str, additional: &[String]) -> ValidationResult {
        let parsed = match self.engine.check_syntax(template) {
            Ok(parsed) => parsed,
            Err(err) => return ValidationResult::from_errors(vec![syntax_error(&err)]),
        };

        let mut errors = self.unknown_variables(template, &parsed.variables, additional);
        errors.extend(unknown_filters(template, &parsed.filters));
        ValidationResult::from_errors(errors)
    }

    fn unknown_variables(
        &self,
        template: &str,
        referenced: &BTreeSet<String>,
        additional: &[String],
    ) -> Vec<ValidationError> {
        referenced
            .iter()
            .filter(|name| !self.registry.has(name) && !additional.iter().any(|a| a == *name))
            .map(|name| {
                if let Some(offset) = scan::find_call(template, name) {
                    return function_call_error(template, name, offset);
                }
                let candidates = self
                    .registry
                    .get_all_names()
                    .into_iter()
                    .chain(additional.iter().map(String::as_str));
                let suggestion = closest_match(name, candidates).map(str::to_string);
                let message = match &suggestion {
                    Some(s) => format!("Unknown variable '{name}'. Did you mean '{s}'?"),
                    None => format!(
                        "Unknown variable '{name}'. Check the variables list for the names available to this template."
                    ),
                };
                let (line, column) = locate(template, scan::find_reference(template, name));
                ValidationError {
                    kind: ValidationErrorKind::UnknownVariable,
                    message,
                    name: Some(name.clone()),
                    suggestion,
                    line,
                    column,
                }
            })
            .collect()
    }
}

fn unknown_filters(template: &str, referenced: &BTreeSet<String>) -> Vec<ValidationError> {
    let scanned = scan::scan(template);
    referenced
        .iter()
        .filter(|name| !is_known_filter(name))
        .map(|name| {
            let suggestion = closest_match(name, KNOWN_FILTERS.iter().copied()).map(str::to_string);
            let message = match &suggestion {
                Some(s) => format!("Unknown filter '{name}'. Did you mean '{s}'?"),
                None => format!(
                    "Unknown filter '{name}'. Available filters are: {}.",
                    KNOWN_FILTERS.join(", ")
                ),
            };
            let offset = scanned
                .filters
                .iter()
                .find(|f| &f.name == name)
                .map(|f| f.offset);
            let (line, column) = locate(template, offset);
            ValidationError {
                kind: ValidationErrorKind::UnknownFilter,
                message,
                name: Some(name.clone()),
                suggestion,
                line,
                column,
            }
        })
        .collect()
}

/// `range(3)`, `debug()` and friends: the language has no functions.
fn function_call_error(template: &str, name: &str, offset: usize) -> ValidationError {
    let (line, column) = line_col(template, offset);
    ValidationError {
        kind: ValidationErrorKind::UnknownVariable,
        message: format!(
            "'{name}(...)' is a function call, and functions are not supported in templates. Use a variable or a filter instead."
        ),
        name: Some(name.to_string()),
        suggestion: None,
        line: Some(line),
        column: Some(column),
    }
}

fn syntax_error(err: &ParseError) -> ValidationError {
    ValidationError {
        kind: ValidationErrorKind::Syntax,
        message: simplify_message(&err.message).to_string(),
        name: None,
        suggestion: None,
        line: err.line,
        column: err.column,
    }
}

fn locate(template: &str, offset: Option<usize>) -> (Option<usize>, Option<usize>) {
    match offset {
        Some(offset) => {
            let (line, column) = line_col(template, offset);
            (Some(line), Some(column))
        }
        None => (None, None),
    }
}
