//! Attendee address handling.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static MAILTO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)mailto:([^\s;,:<>"]+)"#).expect("valid mailto regex"));

/// Permissive syntactic check: something, `@`, something, `.`, something,
/// with no whitespace. Says nothing about deliverability.
pub fn is_valid_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// Pull the address out of a `mailto:` URI somewhere in an ATTENDEE line.
pub fn extract_mailto(line: &str) -> Option<&str> {
    MAILTO_RE
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}
