//! Lexical scanning of template source.
//!
//! Finds filter references and statement keywords without evaluating
//! anything. Works on the raw source so it can report byte offsets for
//! line/column diagnostics.

use std::sync::LazyLock;

use regex::Regex;

/// `{# ... #}` comments; stripped (blanked) before scanning.
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{#.*?#\}").expect("valid regex"));

/// `{% raw %}...{% endraw %}` blocks; the body is literal text.
static RAW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{%[-+]?\s*raw\s*[-+]?%\}(?P<body>.*?)\{%[-+]?\s*endraw\s*[-+]?%\}")
        .expect("valid regex")
});

/// Single- or double-quoted string literal.
const STRING_PATTERN: &str = r#"'(?:[^'\\]|\\.)*'|"(?:[^"\\]|\\.)*""#;

/// `{{ ... }}` expressions and `{% ... %}` statements. Quoted strings are
/// consumed whole so a `}}` or `%}` inside a literal does not end the tag.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"(?s)\{{\{{(?P<expr>(?:{STRING_PATTERN}|[^'"])*?)\}}\}}|\{{%(?P<stmt>(?:{STRING_PATTERN}|[^'"])*?)%\}}"#
    ))
    .expect("valid regex")
});

/// String literals inside a tag; blanked before matching names.
static STRING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(STRING_PATTERN).expect("valid regex"));

/// `| name` filter applications.
static PIPE_FILTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|\s*([A-Za-z_][A-Za-z0-9_]*)").expect("valid regex"));

/// Leading keyword of a statement, after optional whitespace control.
static KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?\s*([A-Za-z_][A-Za-z0-9_]*)").expect("valid regex"));

/// `{% filter name %}` blocks.
static FILTER_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?\s*filter\s+([A-Za-z_][A-Za-z0-9_]*)").expect("valid regex")
});

/// `elsif` keyword, accepted as a spelling of `elif`.
static ELSIF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\{%[-+]?\s*)elsif\b").expect("valid regex"));

/// A name found in the source together with its byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub name: String,
    pub offset: usize,
}

/// Everything the scanner extracts from one template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub filters: Vec<Located>,
    pub statements: Vec<Located>,
}

/// Rewrite `{% elsif %}` to `{% elif %}`.
///
/// The replacement keeps the source length unchanged (`elsif` becomes
/// `elif ` with a trailing space) so byte offsets reported for the rewritten
/// source still point at the same place in the original.
pub fn normalize_syntax(source: &str) -> String {
    ELSIF_RE.replace_all(source, "${1}elif ").into_owned()
}

/// Replace every char of the match with spaces, preserving byte offsets.
fn blank_out(text: &str, re: &Regex) -> String {
    re.replace_all(text, |caps: &regex::Captures<'_>| " ".repeat(caps[0].len()))
        .into_owned()
}

/// Blank the body of every raw block, keeping the raw tags themselves.
fn blank_raw_bodies(text: &str) -> String {
    RAW_RE
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let whole = &caps[0];
            let Some(body) = caps.name("body") else {
                return whole.to_string();
            };
            let start = body.start() - caps.get(0).map_or(0, |m| m.start());
            let end = start + body.len();
            format!("{}{}{}", &whole[..start], " ".repeat(body.len()), &whole[end..])
        })
        .into_owned()
}

/// Source with raw-block bodies and comments blanked; same byte length.
fn masked(source: &str) -> String {
    blank_out(&blank_raw_bodies(source), &COMMENT_RE)
}

/// Scan `source` for filter names and statement keywords.
pub fn scan(source: &str) -> ScanResult {
    let source = masked(source);
    let mut result = ScanResult::default();

    for caps in TAG_RE.captures_iter(&source) {
        let (inner, is_statement) = match (caps.name("expr"), caps.name("stmt")) {
            (Some(expr), _) => (expr, false),
            (None, Some(stmt)) => (stmt, true),
            (None, None) => continue,
        };
        let base = inner.start();
        let body = blank_out(inner.as_str(), &STRING_RE);

        if is_statement {
            if let Some(kw) = KEYWORD_RE.captures(&body).and_then(|c| c.get(1)) {
                result.statements.push(Located {
                    name: kw.as_str().to_string(),
                    offset: base + kw.start(),
                });
            }
            if let Some(name) = FILTER_BLOCK_RE.captures(&body).and_then(|c| c.get(1)) {
                result.filters.push(Located {
                    name: name.as_str().to_string(),
                    offset: base + name.start(),
                });
            }
        }

        for m in PIPE_FILTER_RE.captures_iter(&body).filter_map(|c| c.get(1)) {
            result.filters.push(Located {
                name: m.as_str().to_string(),
                offset: base + m.start(),
            });
        }
    }
    result
}

/// Byte offset of the first reference to identifier `name` inside a tag.
pub fn find_reference(source: &str, name: &str) -> Option<usize> {
    find_in_tags(source, &format!(r"\b(?P<name>{})\b", regex::escape(name)))
}

/// Byte offset of the first call `name(...)` inside a tag. Method calls
/// (`x.name(...)`) do not count.
pub fn find_call(source: &str, name: &str) -> Option<usize> {
    find_in_tags(
        source,
        &format!(r"(?:^|[^.\w])(?P<name>{})\s*\(", regex::escape(name)),
    )
}

/// Offset of the `name` group of the first match of `pattern` in any tag.
fn find_in_tags(source: &str, pattern: &str) -> Option<usize> {
    let re = Regex::new(pattern).ok()?;
    let source_blanked = masked(source);
    TAG_RE.captures_iter(&source_blanked).find_map(|caps| {
        let inner = caps.name("expr").or_else(|| caps.name("stmt"))?;
        let body = blank_out(inner.as_str(), &STRING_RE);
        let found = re.captures(&body)?.name("name")?;
        Some(inner.start() + found.start())
    })
}

/// 1-based line and column of a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(nl) => before[nl + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter_names(source: &str) -> Vec<String> {
        scan(source).filters.into_iter().map(|l| l.name).collect()
    }

    #[test]
    fn finds_pipe_filters() {
        assert_eq!(
            filter_names("{{ name | upper }} and {{ title|trim|capitalize }}"),
            vec!["upper", "trim", "capitalize"]
        );
    }

    #[test]
    fn finds_filters_inside_statements() {
        assert_eq!(
            filter_names("{% if genre | lower == 'horror' %}boo{% endif %}"),
            vec!["lower"]
        );
    }

    #[test]
    fn finds_filter_blocks() {
        assert_eq!(
            filter_names("{% filter upper %}loud{% endfilter %}"),
            vec!["upper"]
        );
    }

    #[test]
    fn ignores_pipes_in_strings_and_text() {
        assert!(filter_names("a | b outside {{ 'x | y' }}").is_empty());
        assert!(filter_names("{# {{ x | secret }} #}").is_empty());
    }

    #[test]
    fn reports_statement_keywords() {
        let statements: Vec<String> = scan("{% if a %}{%- for x in xs -%}{% endfor %}{% endif %}")
            .statements
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(statements, vec!["if", "for", "endfor", "endif"]);
    }

    #[test]
    fn offsets_point_into_original_source() {
        let source = "line one\n{{ x | shout }}";
        let found = &scan(source).filters[0];
        assert_eq!(&source[found.offset..found.offset + 5], "shout");
        assert_eq!(line_col(source, found.offset), (2, 8));
    }

    #[test]
    fn elsif_is_rewritten_without_changing_length() {
        let source = "{% if a %}1{% elsif b %}2{%- elsif c %}3{% endif %}";
        let normalized = normalize_syntax(source);
        assert_eq!(normalized.len(), source.len());
        assert!(normalized.contains("{% elif  b %}"));
        assert!(normalized.contains("{%- elif  c %}"));
        assert!(!normalized.contains("elsif"));
    }

    #[test]
    fn elsif_in_plain_text_is_untouched() {
        assert_eq!(normalize_syntax("elsif is a word"), "elsif is a word");
    }

    #[test]
    fn finds_first_reference_inside_tags_only() {
        let source = "protagonistName is {{ 'protagonistName' }}\n{{ protagonistName }}";
        let offset = find_reference(source, "protagonistName").unwrap();
        assert_eq!(line_col(source, offset), (2, 4));
        assert!(find_reference(source, "genre").is_none());
    }

    #[test]
    fn raw_block_bodies_are_not_scanned() {
        let source = "{% raw %}Write {{ name | shout }} {% include 'x' %}{% endraw %}{{ a | upper }}";
        let scanned = scan(source);
        assert_eq!(
            scanned.filters.into_iter().map(|l| l.name).collect::<Vec<_>>(),
            vec!["upper"]
        );
        let statements: Vec<String> = scanned.statements.into_iter().map(|l| l.name).collect();
        assert_eq!(statements, vec!["raw", "endraw"]);
        assert!(find_reference(source, "name").is_none());
    }

    #[test]
    fn closing_braces_inside_strings_do_not_end_the_tag() {
        let source = r#"{{ "}}" | shout }} {% set x = '%}' | trim %}"#;
        assert_eq!(filter_names(source), vec!["shout", "trim"]);
        let found = &scan(source).filters[0];
        assert_eq!(&source[found.offset..found.offset + 5], "shout");
    }

    #[test]
    fn finds_function_calls_only() {
        let source = "{{ range }}\n{% for i in range(3) %}{{ loop.cycle('a') }}{% endfor %}";
        let offset = find_call(source, "range").unwrap();
        assert_eq!(line_col(source, offset), (2, 13));
        assert!(find_call(source, "cycle").is_none());
        assert!(find_call("{{ 'debug()' }}", "debug").is_none());
    }

    #[test]
    fn line_col_of_first_char() {
        assert_eq!(line_col("abc", 0), (1, 1));
        assert_eq!(line_col("a\nbc", 3), (2, 2));
    }
}
