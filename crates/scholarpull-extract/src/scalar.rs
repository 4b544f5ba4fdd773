//! Scalar field matching: `"name": "value"` and `"name": 123` pairs.
//!
//! Matching is purely textual. A quoted value ends at the first literal `"`,
//! so a value containing `\"` comes back truncated at the backslash. Only
//! unsigned ASCII integers are recognized; negative and fractional numbers are
//! skipped over.

use regex::Regex;

use crate::span::Span;

/// Pattern prefix matching `"<key>"` followed by a colon, with optional ASCII
/// whitespace on either side. The key is escaped so it always matches literally.
pub(crate) fn key_prefix(key: &str) -> String {
    format!(r#""{}"[[:space:]]*:[[:space:]]*"#, regex::escape(key))
}

/// Compile a per-call pattern. Escaped keys always yield a valid pattern, but
/// a failure (e.g. an absurdly long key) is reported as "no match".
pub(crate) fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::debug!(error = %e, "field pattern failed to compile");
            None
        }
    }
}

/// Locate the quoted string value of the first `"field": "..."` pair.
/// The returned span excludes the surrounding quotes.
pub fn find_string(text: &str, field: &str) -> Option<Span> {
    if field.is_empty() {
        return None;
    }
    let re = compile(&format!(r#"{}"([^"]*)""#, key_prefix(field)))?;
    let caps = re.captures(text)?;
    caps.get(1).map(Span::from)
}

/// The first `"field": "value"` string in `text`, or `None`.
pub fn match_string<'t>(text: &'t str, field: &str) -> Option<&'t str> {
    find_string(text, field).map(|span| span.slice(text))
}

/// Locate the digit run of the first `"field": <digits>` pair whose value is
/// an unsigned integer literal.
pub fn find_int(text: &str, field: &str) -> Option<Span> {
    if field.is_empty() {
        return None;
    }
    // The trailing group catches fractions and exponents so `1.5` and `2e3`
    // are not mistaken for `1` and `2`.
    let re = compile(&format!(
        r"{}([0-9]+)(\.[0-9]|[eE])?",
        key_prefix(field)
    ))?;
    re.captures_iter(text)
        .find(|caps| caps.get(2).is_none())
        .and_then(|caps| caps.get(1))
        .map(Span::from)
}

/// The first `"field": <digits>` integer in `text`, or `None`.
///
/// A value too large for `u64` is reported as absent.
pub fn match_int(text: &str, field: &str) -> Option<u64> {
    let span = find_int(text, field)?;
    match span.slice(text).parse::<u64>() {
        Ok(n) => Some(n),
        Err(e) => {
            tracing::debug!(field, error = %e, "integer value out of range");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_string_basic() {
        let text = r#"{"error": "Invalid API key", "other": "x"}"#;
        assert_eq!(match_string(text, "error"), Some("Invalid API key"));
        assert_eq!(match_string(text, "other"), Some("x"));
    }

    #[test]
    fn test_match_string_whitespace_variants() {
        assert_eq!(match_string("\"a\":\"1\"", "a"), Some("1"));
        assert_eq!(match_string("\"a\"  :\n\t \"2\"", "a"), Some("2"));
    }

    #[test]
    fn test_match_string_first_occurrence_wins() {
        let text = r#"{"title": "First", "nested": {"title": "Second"}}"#;
        assert_eq!(match_string(text, "title"), Some("First"));
    }

    #[test]
    fn test_match_string_empty_value_is_present() {
        assert_eq!(match_string(r#"{"link": ""}"#, "link"), Some(""));
    }

    #[test]
    fn test_match_string_missing() {
        assert_eq!(match_string(r#"{"title": "A"}"#, "year"), None);
        assert_eq!(match_string("", "title"), None);
    }

    #[test]
    fn test_match_string_skips_non_string_values() {
        // `"year": 2020` is not a string pair; the later string one is.
        let text = r#"{"year": 2020, "x": {"year": "2021"}}"#;
        assert_eq!(match_string(text, "year"), Some("2021"));
    }

    #[test]
    fn test_escaped_quote_truncates() {
        let text = r#"{"title": "The \"Best\" Paper"}"#;
        assert_eq!(match_string(text, "title"), Some(r"The \"));
    }

    #[test]
    fn test_key_is_literal_not_pattern() {
        let text = r#"{"a.b": "dotted", "axb": "wrong"}"#;
        assert_eq!(match_string(text, "a.b"), Some("dotted"));
        assert_eq!(match_string(r#"{"axb": "wrong"}"#, "a.b"), None);
        assert_eq!(match_string(r#"{"(x)+": "y"}"#, "(x)+"), Some("y"));
    }

    #[test]
    fn test_key_must_be_whole() {
        // "authors" must not satisfy a lookup for "author".
        let text = r#"{"authors": "A, B", "author_id": "x"}"#;
        assert_eq!(match_string(text, "author"), None);
    }

    #[test]
    fn test_empty_key_is_absent() {
        assert_eq!(match_string(r#"{"": "v"}"#, ""), None);
        assert_eq!(match_int(r#"{"": 1}"#, ""), None);
    }

    #[test]
    fn test_value_may_span_lines() {
        let text = "{\"snippet\": \"line one\nline two\"}";
        assert_eq!(match_string(text, "snippet"), Some("line one\nline two"));
    }

    #[test]
    fn test_match_int_basic() {
        assert_eq!(match_int(r#"{"value": 42}"#, "value"), Some(42));
        assert_eq!(match_int(r#"{"value":0}"#, "value"), Some(0));
    }

    #[test]
    fn test_match_int_rejects_negative_and_decimal() {
        assert_eq!(match_int(r#"{"value": -5}"#, "value"), None);
        assert_eq!(match_int(r#"{"value": 1.5}"#, "value"), None);
        assert_eq!(match_int(r#"{"value": 2e3}"#, "value"), None);
        assert_eq!(match_int(r#"{"value": "12"}"#, "value"), None);
    }

    #[test]
    fn test_match_int_continues_past_non_integer() {
        let text = r#"{"value": 1.5, "inner": {"value": 7}}"#;
        assert_eq!(match_int(text, "value"), Some(7));
    }

    #[test]
    fn test_match_int_trailing_dot_without_digit() {
        // A dot not followed by a digit does not make the number fractional.
        assert_eq!(match_int(r#""value": 12."#, "value"), Some(12));
    }

    #[test]
    fn test_match_int_overflow_is_absent() {
        let text = r#"{"value": 99999999999999999999999}"#;
        assert_eq!(match_int(text, "value"), None);
    }

    #[test]
    fn test_find_string_span_offsets() {
        let text = r#"{"name": "Ada"}"#;
        let span = find_string(text, "name").unwrap();
        assert_eq!(span, Span::new(10, 13));
        assert_eq!(span.slice(text), "Ada");
    }
}
