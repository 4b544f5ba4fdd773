//! Object scoping: narrow the text to the body of a named `{...}` object.
//!
//! The body runs from the `{` after `"name":` up to the *next* `}`. Nested
//! braces are not counted, so an object holding a sub-object before the field
//! you want gets cut short at the sub-object's closing brace. The array
//! segmenter in [`crate::array`] counts one level of nesting; this scoper
//! deliberately does not, and callers rely on the difference.

use crate::scalar::{self, compile, key_prefix};
use crate::span::Span;

/// Span of the body of the first `"name": { ... }` object, excluding the
/// braces themselves, or `None` when the key is missing or not followed by `{`
/// and a later `}`.
pub fn find_object_span(text: &str, name: &str) -> Option<Span> {
    if name.is_empty() {
        return None;
    }
    let re = compile(&format!(r"(?s){}\{{(.*?)\}}", key_prefix(name)))?;
    let caps = re.captures(text)?;
    caps.get(1).map(Span::from)
}

/// Body text of the first `"name": { ... }` object.
pub fn find_object<'t>(text: &'t str, name: &str) -> Option<&'t str> {
    find_object_span(text, name).map(|span| span.slice(text))
}

/// `object.field` as a string. An absent object means an absent field, even
/// if `field` appears elsewhere in the text.
pub fn find_nested_string<'t>(text: &'t str, object: &str, field: &str) -> Option<&'t str> {
    let body = find_object(text, object)?;
    scalar::match_string(body, field)
}

/// `object.field` as an unsigned integer.
pub fn find_nested_int(text: &str, object: &str, field: &str) -> Option<u64> {
    let body = find_object(text, object)?;
    scalar::match_int(body, field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_object_body() {
        let text = r#"{"author": {"name": "Ada", "affiliations": "Analytical Engines"}}"#;
        assert_eq!(
            find_object(text, "author"),
            Some(r#""name": "Ada", "affiliations": "Analytical Engines""#)
        );
    }

    #[test]
    fn test_nested_string() {
        let text = r#"{"author": {"name": "Ada", "affiliations": "Analytical Engines"}}"#;
        assert_eq!(find_nested_string(text, "author", "name"), Some("Ada"));
        assert_eq!(
            find_nested_string(text, "author", "affiliations"),
            Some("Analytical Engines")
        );
        assert_eq!(find_nested_string(text, "author", "email"), None);
    }

    #[test]
    fn test_absent_object_hides_field_elsewhere() {
        let text = r#"{"name": "Top Level", "profile": {"name": "Inner"}}"#;
        assert_eq!(find_nested_string(text, "author", "name"), None);
    }

    #[test]
    fn test_field_outside_object_not_seen() {
        let text = r#"{"author": {"email": "a@b.c"}, "name": "Outside"}"#;
        assert_eq!(find_nested_string(text, "author", "name"), None);
    }

    #[test]
    fn test_nested_int() {
        let block = r#"{"title": "A", "cited_by": {"value": 5, "link": "x"}}"#;
        assert_eq!(find_nested_int(block, "cited_by", "value"), Some(5));
        assert_eq!(find_nested_int(block, "cited_by", "total"), None);
    }

    #[test]
    fn test_lazy_body_truncates_at_inner_brace() {
        let text = r#"{"author": {"meta": {"id": 1}, "name": "Ada"}}"#;
        let body = find_object(text, "author").unwrap();
        assert_eq!(body, r#""meta": {"id": 1"#);
        // The field after the nested object is lost.
        assert_eq!(find_nested_string(text, "author", "name"), None);
    }

    #[test]
    fn test_body_may_span_lines() {
        let text = "{\"author\": {\n  \"name\": \"Ada\"\n}}";
        assert_eq!(find_nested_string(text, "author", "name"), Some("Ada"));
    }

    #[test]
    fn test_key_not_followed_by_object() {
        assert_eq!(find_object_span(r#"{"author": "Ada"}"#, "author"), None);
        assert_eq!(find_object_span(r#"{"author": {"name": "Ada""#, "author"), None);
    }

    #[test]
    fn test_empty_object() {
        let text = r#"{"cited_by": {}}"#;
        let span = find_object_span(text, "cited_by").unwrap();
        assert!(span.is_empty());
        assert_eq!(find_nested_int(text, "cited_by", "value"), None);
    }
}
