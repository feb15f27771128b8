//! Plain-language wording for engine errors.
//!
//! Raw engine messages never reach the author. Each is matched against a
//! table of recognized substrings; the first rule that matches supplies a
//! fixed message, and anything unrecognized gets [`GENERIC_SYNTAX_MESSAGE`].

/// Fallback for errors no rule recognizes.
pub const GENERIC_SYNTAX_MESSAGE: &str = "Template contains an error. Please check the syntax.";

const UNCLOSED_MESSAGE: &str = "A tag or block is not closed. Make sure every {{ has a matching }}, \
     and every {% if %} or {% for %} ends with {% endif %} or {% endfor %}.";

const UNTERMINATED_STRING_MESSAGE: &str =
    "A piece of quoted text is missing its closing quote mark.";

const UNKNOWN_TAG_MESSAGE: &str = "This template uses a tag that is not supported. \
     Available tags are if, elsif, else, for and set.";

const UNEXPECTED_TOKEN_MESSAGE: &str = "Something unexpected was found inside a tag. \
     Check for typos, missing quotes or extra symbols.";

const UNKNOWN_FILTER_MESSAGE: &str = "This template uses a filter that does not exist.";

const UNKNOWN_TEST_MESSAGE: &str =
    "An 'is' check in this template is not supported. Compare values with == or != instead.";

/// Ordered rules: more specific patterns come first.
const RULES: &[(&[&str], &str)] = &[
    (
        &[
            "unexpected end of input",
            "unclosed",
            "unterminated block",
            "missing end",
        ],
        UNCLOSED_MESSAGE,
    ),
    (&["unterminated string"], UNTERMINATED_STRING_MESSAGE),
    (
        &["unsupported tag", "unknown statement", "unknown tag", "unknown block"],
        UNKNOWN_TAG_MESSAGE,
    ),
    (&["unknown filter"], UNKNOWN_FILTER_MESSAGE),
    (&["unknown test"], UNKNOWN_TEST_MESSAGE),
    (
        &["unexpected", "expected", "invalid syntax"],
        UNEXPECTED_TOKEN_MESSAGE,
    ),
];

/// Map a raw engine message to a plain-language one.
pub fn simplify_message(raw: &str) -> &'static str {
    let lowered = raw.to_lowercase();
    RULES
        .iter()
        .find(|(patterns, _)| patterns.iter().any(|p| lowered.contains(p)))
        .map(|(_, message)| *message)
        .unwrap_or(GENERIC_SYNTAX_MESSAGE)
}
