//! The fixed filter library available to templates.

use minijinja::{Environment, Error, Value};

/// Every filter a template may use. Anything else is rejected by the strict
/// parse and reported by the validator.
pub const KNOWN_FILTERS: &[&str] = &[
    // minijinja built-ins
    "abs",
    "capitalize",
    "default",
    "first",
    "float",
    "indent",
    "int",
    "join",
    "last",
    "length",
    "list",
    "lower",
    "replace",
    "reverse",
    "round",
    "sort",
    "title",
    "trim",
    "unique",
    "upper",
    // story-writing helpers
    "bullets",
    "truncate",
    "wordcount",
];

/// Default cut-off for `truncate` when no length is given.
const DEFAULT_TRUNCATE_LEN: usize = 255;

pub fn is_known_filter(name: &str) -> bool {
    KNOWN_FILTERS.contains(&name)
}

/// Register the custom filters on an environment.
pub fn register(env: &mut Environment<'static>) {
    env.add_filter("bullets", bullets);
    env.add_filter("truncate", truncate);
    env.add_filter("wordcount", wordcount);
}

/// `{{ entries | bullets }}`: one `- item` line per element.
fn bullets(value: Value) -> Result<String, Error> {
    if value.is_undefined() || value.is_none() {
        return Ok(String::new());
    }
    if let Some(s) = value.as_str() {
        return Ok(format!("- {s}"));
    }
    let lines: Vec<String> = value.try_iter()?.map(|item| format!("- {item}")).collect();
    Ok(lines.join("\n"))
}

/// `{{ summary | truncate(200) }}`: cut to at most `length` characters,
/// ending with `...` when something was removed.
fn truncate(value: Value, length: Option<usize>) -> String {
    if value.is_undefined() || value.is_none() {
        return String::new();
    }
    let text = value.to_string();
    let length = length.unwrap_or(DEFAULT_TRUNCATE_LEN);
    if text.chars().count() <= length {
        return text;
    }
    let kept: String = text.chars().take(length.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}

/// `{{ chapter | wordcount }}`
fn wordcount(value: Value) -> usize {
    if value.is_undefined() || value.is_none() {
        return 0;
    }
    value.to_string().split_whitespace().count()
}
