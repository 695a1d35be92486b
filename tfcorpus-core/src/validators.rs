// File: tfcorpus-core/src/validators.rs
//! Structural plausibility checks for Terraform files.
//!
//! This is not a parser. It rejects blobs that cannot be a meaningful
//! configuration file and lets malformed-but-balanced files through.
//!
//! License: MIT OR APACHE 2.0

use once_cell::sync::Lazy;
use regex::Regex;

use crate::formatting::split_lines;

/// Block keywords that may open a top-level declaration.
pub const BLOCK_KEYWORDS: &[&str] = &[
    "resource",
    "module",
    "data",
    "variable",
    "output",
    "locals",
    "terraform",
    "provider",
];

static DECLARATION_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r#"\b({})\s+""#, BLOCK_KEYWORDS.join("|"))).unwrap()
});

/// Minimum number of code lines (non-blank, not a pure comment).
const MIN_CODE_LINES: usize = 3;

/// Returns `true` if the content contains a declaration header such as
/// `resource "aws_instance"`.
pub fn has_declaration_header(content: &str) -> bool {
    DECLARATION_HEADER.is_match(content)
}

/// Returns `true` if `{` and `}` occur equally often and at least once.
pub fn has_balanced_braces(content: &str) -> bool {
    let open = content.matches('{').count();
    let close = content.matches('}').count();
    open > 0 && open == close
}

/// Counts lines that are neither blank nor start with `#` or `//`.
pub fn count_code_lines(content: &str) -> usize {
    split_lines(content)
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with("//"))
        .count()
}

/// Cheap syntactic filter deciding whether a blob is worth keeping.
pub fn is_valid_terraform(content: &str) -> bool {
    has_declaration_header(content)
        && has_balanced_braces(content)
        && count_code_lines(content) >= MIN_CODE_LINES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_code_lines_are_not_enough() {
        let content = "resource \"x\" \"y\" {}\n# only a comment\n\nlocals {}\n";
        assert_eq!(count_code_lines(content), 2);
        assert!(!is_valid_terraform(content));

        let content = format!("{}output \"z\" {{}}\n", content);
        assert!(is_valid_terraform(&content));
    }

    #[test]
    fn header_requires_quoted_label() {
        assert!(has_declaration_header("variable  \"region\" {"));
        assert!(has_declaration_header("data\t\"aws_ami\" \"ubuntu\" {"));
        assert!(!has_declaration_header("locals {"));
        assert!(!has_declaration_header("myresource \"x\""));
        assert!(!has_declaration_header("resource x"));
    }

    #[test]
    fn braces_must_balance_and_exist() {
        assert!(has_balanced_braces("a { b { } }"));
        assert!(!has_balanced_braces("a { b { }"));
        assert!(!has_balanced_braces("no braces here"));
    }

    #[test]
    fn brace_free_content_is_invalid() {
        let content = "resource \"a\" \"b\"\nx = 1\ny = 2\nz = 3\n";
        assert!(!is_valid_terraform(content));
    }

    #[test]
    fn carriage_return_endings_count_as_lines() {
        let content = "resource \"aws_s3_bucket\" \"b\" {\r  bucket = \"logs\" # note\r  acl = \"private\"\r}\r";
        assert_eq!(count_code_lines(content), 4);
        assert!(is_valid_terraform(content));
    }

    #[test]
    fn slash_comment_lines_do_not_count() {
        let content = "resource \"a\" \"b\" {\n// one\n  // two\n}\n";
        assert_eq!(count_code_lines(content), 2);
        assert!(!is_valid_terraform(content));
    }
}
