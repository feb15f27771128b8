//! Template engine backed by minijinja.
//!
//! - [`TemplateEngine::render`] is the production path. It never fails: any
//!   parse or runtime error yields an empty string and a `warn` log, and
//!   unknown variables render as empty strings.
//! - [`TemplateEngine::parse`] is the editing path. It reports malformed
//!   syntax with line/column, rejects statements outside the supported
//!   language and rejects filters outside
//!   [`KNOWN_FILTERS`](super::filters::KNOWN_FILTERS).

use std::collections::BTreeSet;

use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;

use super::filters::{self, is_known_filter};
use super::scan::{self, line_col};
use crate::context::RenderContext;

/// Statement keywords the language supports.
const SUPPORTED_STATEMENTS: &[&str] = &[
    "if", "elif", "elsif", "else", "endif", "for", "endfor", "set", "endset", "filter",
    "endfilter", "raw", "endraw", "break", "continue",
];

/* --------------------------------------------------------------------------
   Parse results
   -------------------------------------------------------------------------- */

/// Why a strict parse failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseErrorKind {
    /// The grammar rejected the template, or it uses an unsupported statement.
    Syntax,
    /// The template is well-formed but applies a filter outside the library.
    UnknownFilter { name: String },
}

/// A structured strict-parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Raw engine message. Not meant for end users; the validator maps it to
    /// plain language.
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(col)) => write!(f, "{} (line {line}, column {col})", self.message),
            (Some(line), None) => write!(f, "{} (line {line})", self.message),
            _ => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// What a successful parse learned about a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTemplate {
    /// Variables the template reads without declaring them itself.
    pub variables: BTreeSet<String>,
    /// Every filter name it applies.
    pub filters: BTreeSet<String>,
}

/* --------------------------------------------------------------------------
   Engine
   -------------------------------------------------------------------------- */

pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create an engine with the fixed filter library.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Chainable);
        // Prompts are plain text.
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_keep_trailing_newline(true);
        filters::register(&mut env);
        Self { env }
    }

    /// Render `template` against `context`.
    ///
    /// Never fails. On any error the result is an empty string and the fault
    /// is logged.
    pub fn render(&self, template: &str, context: &RenderContext) -> String {
        let source = scan::normalize_syntax(template);
        match self.env.render_str(&source, context) {
            Ok(output) => output,
            Err(err) => {
                tracing::warn!(
                    kind = ?err.kind(),
                    line = ?err.line(),
                    detail = err.detail().unwrap_or_default(),
                    "Template render failed; substituting empty output"
                );
                String::new()
            }
        }
    }

    /// Strict parse: grammar, supported statements and known filters.
    pub fn parse(&self, template: &str) -> Result<ParsedTemplate, ParseError> {
        let parsed = self.check_syntax(template)?;
        let scanned = scan::scan(template);
        if let Some(unknown) = scanned.filters.iter().find(|f| !is_known_filter(&f.name)) {
            let (line, column) = line_col(template, unknown.offset);
            return Err(ParseError {
                kind: ParseErrorKind::UnknownFilter {
                    name: unknown.name.clone(),
                },
                message: format!("unknown filter: {}", unknown.name),
                line: Some(line),
                column: Some(column),
            });
        }
        Ok(parsed)
    }

    /// Grammar-only parse. Unknown filters are *not* an error here; they are
    /// listed in [`ParsedTemplate::filters`] for the caller to check.
    pub fn check_syntax(&self, template: &str) -> Result<ParsedTemplate, ParseError> {
        let source = scan::normalize_syntax(template);
        let compiled = self
            .env
            .template_from_str(&source)
            .map_err(|err| syntax_error(template, &err))?;
        let variables: BTreeSet<String> = compiled.undeclared_variables(false).into_iter().collect();

        let scanned = scan::scan(template);
        if let Some(stmt) = scanned
            .statements
            .iter()
            .find(|s| !SUPPORTED_STATEMENTS.contains(&s.name.as_str()))
        {
            let (line, column) = line_col(template, stmt.offset);
            return Err(ParseError {
                kind: ParseErrorKind::Syntax,
                message: format!("unsupported tag: {}", stmt.name),
                line: Some(line),
                column: Some(column),
            });
        }

        Ok(ParsedTemplate {
            variables,
            filters: scanned.filters.into_iter().map(|f| f.name).collect(),
        })
    }

    /// Every variable the template references, discovered statically.
    /// Returns an empty set for a template that does not parse.
    pub fn extract_variable_names(&self, template: &str) -> BTreeSet<String> {
        let source = scan::normalize_syntax(template);
        match self.env.template_from_str(&source) {
            Ok(compiled) => compiled.undeclared_variables(false).into_iter().collect(),
            Err(_) => BTreeSet::new(),
        }
    }

    /// Every filter name applied anywhere in the template.
    pub fn extract_filter_names(&self, template: &str) -> BTreeSet<String> {
        scan::scan(template)
            .filters
            .into_iter()
            .map(|f| f.name)
            .collect()
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a minijinja compile error into a [`ParseError`].
fn syntax_error(original: &str, err: &minijinja::Error) -> ParseError {
    let message = match err.detail() {
        Some(detail) => format!("{}: {detail}", err.kind()),
        None => err.kind().to_string(),
    };
    let (line, column) = match err.range() {
        Some(range) => {
            let (line, column) = line_col(original, range.start);
            (Some(line), Some(column))
        }
        None => (err.line(), None),
    };
    ParseError {
        kind: ParseErrorKind::Syntax,
        message,
        line,
        column,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RenderContext {
        RenderContext::new()
    }

    const SWORD: &str = "{% if mode == 'adventure' %}You{% else %}{{protagonistName}}{% endif %} draw your sword.";

    // -- render --

    #[test]
    fn sword_scenario_adventure() {
        let engine = TemplateEngine::new();
        let out = engine.render(SWORD, &ctx().with("mode", "adventure"));
        assert_eq!(out, "You draw your sword.");
    }

    #[test]
    fn sword_scenario_creative_writing() {
        let engine = TemplateEngine::new();
        let context = ctx()
            .with("mode", "creative-writing")
            .with("protagonistName", "Elena");
        assert_eq!(engine.render(SWORD, &context), "Elena draw your sword.");
    }

    #[test]
    fn unknown_variables_render_empty() {
        let engine = TemplateEngine::new();
        assert_eq!(engine.render("[{{ missing }}]", &ctx()), "[]");
        assert_eq!(engine.render("[{{ missing.deeper }}]", &ctx()), "[]");
    }

    #[test]
    fn malformed_template_renders_empty() {
        let engine = TemplateEngine::new();
        assert_eq!(engine.render("{% if mode %}unclosed", &ctx()), "");
        assert_eq!(engine.render("{{ name ", &ctx()), "");
    }

    #[test]
    fn elsif_is_supported() {
        let engine = TemplateEngine::new();
        let template = "{% if pov == 'first' %}I{% elsif pov == 'second' %}You{% else %}They{% endif %}";
        assert_eq!(engine.render(template, &ctx().with("pov", "second")), "You");
        assert_eq!(engine.render(template, &ctx().with("pov", "third")), "They");
    }

    #[test]
    fn loops_and_boolean_logic() {
        let engine = TemplateEngine::new();
        let context = ctx()
            .with("names", vec!["Mira", "Orin"])
            .with("verbose", true)
            .with("turn", 3);
        let out = engine.render(
            "{% for n in names %}{{ loop.index }}:{{ n }} {% endfor %}{% if verbose and turn > 2 %}!{% endif %}",
            &context,
        );
        assert_eq!(out, "1:Mira 2:Orin !");
    }

    #[test]
    fn filters_apply() {
        let engine = TemplateEngine::new();
        let context = ctx().with("name", "elena").with("names", vec!["a", "b"]);
        assert_eq!(engine.render("{{ name | capitalize }}", &context), "Elena");
        assert_eq!(engine.render("{{ names | join(', ') }}", &context), "a, b");
        assert_eq!(engine.render("{{ missing | default('none') }}", &context), "none");
        assert_eq!(engine.render("{{ names | bullets }}", &context), "- a\n- b");
    }

    #[test]
    fn values_are_not_re_expanded() {
        let engine = TemplateEngine::new();
        let context = ctx().with("userAction", "{{ secret }}").with("secret", "x");
        assert_eq!(engine.render("{{ userAction }}", &context), "{{ secret }}");
    }

    #[test]
    fn html_is_not_escaped() {
        let engine = TemplateEngine::new();
        let context = ctx().with("line", "<b>\"Run!\"</b> & hide");
        assert_eq!(engine.render("{{ line }}", &context), "<b>\"Run!\"</b> & hide");
    }

    #[test]
    fn trailing_newline_is_kept() {
        let engine = TemplateEngine::new();
        assert_eq!(engine.render("Hello\n", &ctx()), "Hello\n");
    }

    #[test]
    fn render_is_idempotent() {
        let engine = TemplateEngine::new();
        let context = ctx().with("mode", "adventure");
        assert_eq!(engine.render(SWORD, &context), engine.render(SWORD, &context));
    }

    // -- parse --

    #[test]
    fn valid_template_parses() {
        let engine = TemplateEngine::new();
        let parsed = engine.parse(SWORD).unwrap();
        assert_eq!(
            parsed.variables,
            BTreeSet::from(["mode".to_string(), "protagonistName".to_string()])
        );
        assert!(parsed.filters.is_empty());
    }

    #[test]
    fn unclosed_if_is_a_syntax_error() {
        let engine = TemplateEngine::new();
        let err = engine.parse("{% if mode == 'adventure' %}You").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Syntax);
        assert!(err.line.is_some());
    }

    #[test]
    fn unknown_filter_fails_strict_parse() {
        let engine = TemplateEngine::new();
        let err = engine.parse("Hi\n{{ name | shout }}").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::UnknownFilter {
                name: "shout".to_string()
            }
        );
        assert_eq!(err.line, Some(2));
        assert_eq!(err.column, Some(11));
    }

    #[test]
    fn check_syntax_tolerates_unknown_filters() {
        let engine = TemplateEngine::new();
        let parsed = engine.check_syntax("{{ name | shout }}").unwrap();
        assert!(parsed.filters.contains("shout"));
    }

    #[test]
    fn includes_and_macros_are_rejected() {
        let engine = TemplateEngine::new();
        for template in [
            "{% include 'other.txt' %}",
            "{% macro greet(n) %}hi {{ n }}{% endmacro %}",
            "{% extends 'base.txt' %}",
        ] {
            let err = engine.parse(template).unwrap_err();
            assert_eq!(err.kind, ParseErrorKind::Syntax, "{template}");
            assert!(err.message.starts_with("unsupported tag"), "{template}");
        }
    }

    // -- extraction --

    #[test]
    fn extracts_variables_but_not_loop_locals() {
        let engine = TemplateEngine::new();
        let names = engine.extract_variable_names(
            "{% for e in recentEntries %}{{ e }}{{ loop.index }}{% endfor %}{% set n = 1 %}{{ n }}{{ storyTitle }}",
        );
        assert_eq!(
            names,
            BTreeSet::from(["recentEntries".to_string(), "storyTitle".to_string()])
        );
    }

    #[test]
    fn extraction_of_broken_template_is_empty() {
        let engine = TemplateEngine::new();
        assert!(engine.extract_variable_names("{% if x %}").is_empty());
    }

    #[test]
    fn extracts_filters() {
        let engine = TemplateEngine::new();
        let names = engine.extract_filter_names("{{ a | upper | truncate(5) }}{{ b|lower }}");
        assert_eq!(
            names,
            BTreeSet::from(["lower".to_string(), "truncate".to_string(), "upper".to_string()])
        );
    }
}
