//! Content hashing for pack templates.
//!
//! The stored `content_hash` of a pack template is the SHA-256 hex digest of
//! its *normalized* content, so that trailing whitespace or CRLF line endings
//! never register as a modification against the default pack.

use sha2::{Digest, Sha256};

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// Normalize template content before hashing.
///
/// Line endings are folded to `\n`, trailing whitespace is stripped from every
/// line, and the whole text is trimmed.
pub fn normalize_content(content: &str) -> String {
    let unified = content.replace("\r\n", "\n").replace('\r', "\n");
    unified
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Hash of the normalized form of `content`. This is the value stored in
/// `pack_templates.content_hash`.
pub fn content_hash(content: &str) -> String {
    sha256_hex(normalize_content(content).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_produces_known_hash() {
        let hash = sha256_hex(b"");
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn consistent_output() {
        let data = b"hello world";
        assert_eq!(sha256_hex(data), sha256_hex(data));
        assert_eq!(sha256_hex(data).len(), 64);
    }

    #[test]
    fn crlf_and_lf_hash_identically() {
        assert_eq!(
            content_hash("You draw\r\nyour sword."),
            content_hash("You draw\nyour sword.")
        );
    }

    #[test]
    fn trailing_spaces_do_not_change_hash() {
        assert_eq!(
            content_hash("Line one   \nLine two\t\n\n"),
            content_hash("Line one\nLine two")
        );
    }

    #[test]
    fn leading_and_trailing_blank_lines_are_ignored() {
        assert_eq!(content_hash("\n\n  {{ mode }}\n"), content_hash("{{ mode }}"));
    }

    #[test]
    fn real_edits_change_hash() {
        assert_ne!(content_hash("You draw"), content_hash("You sheathe"));
    }

    #[test]
    fn internal_blank_lines_are_significant() {
        assert_ne!(content_hash("a\n\nb"), content_hash("a\nb"));
    }

    #[test]
    fn normalize_keeps_leading_indentation_inside() {
        assert_eq!(normalize_content("a\n  b  \r\n"), "a\n  b");
    }
}
