use std::fmt;
use std::str::FromStr;

use crate::{ExtractError, object, scalar};

/// A field address inside a payload: either a top-level field (`title`) or a
/// field one object deep (`cited_by.value`).
///
/// Deeper paths are rejected because the object scoper only narrows one level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    object: Option<String>,
    field: String,
}

impl FieldPath {
    /// Parse `field` or `object.field`.
    pub fn parse(path: &str) -> Result<Self, ExtractError> {
        let mut parts = path.split('.');
        let first = parts.next().unwrap_or_default();
        let second = parts.next();
        if parts.next().is_some() {
            return Err(ExtractError::PathTooDeep {
                path: path.to_string(),
            });
        }
        let (object, field) = match second {
            Some(field) => (Some(first), field),
            None => (None, first),
        };
        if field.is_empty() || object.is_some_and(str::is_empty) {
            return Err(ExtractError::EmptyKey {
                path: path.to_string(),
            });
        }
        Ok(Self {
            object: object.map(String::from),
            field: field.to_string(),
        })
    }

    pub fn top_level(field: impl Into<String>) -> Self {
        Self {
            object: None,
            field: field.into(),
        }
    }

    pub fn nested(object: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            object: Some(object.into()),
            field: field.into(),
        }
    }

    pub fn object(&self) -> Option<&str> {
        self.object.as_deref()
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Look the path up as a string value in `text`.
    pub fn string_in<'t>(&self, text: &'t str) -> Option<&'t str> {
        match &self.object {
            Some(object) => object::find_nested_string(text, object, &self.field),
            None => scalar::match_string(text, &self.field),
        }
    }

    /// Look the path up as an unsigned integer value in `text`.
    pub fn int_in(&self, text: &str) -> Option<u64> {
        match &self.object {
            Some(object) => object::find_nested_int(text, object, &self.field),
            None => scalar::match_int(text, &self.field),
        }
    }
}

impl FromStr for FieldPath {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.object {
            Some(object) => write!(f, "{}.{}", object, self.field),
            None => write!(f, "{}", self.field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_top_level() {
        let path = FieldPath::parse("title").unwrap();
        assert_eq!(path, FieldPath::top_level("title"));
        assert_eq!(path.object(), None);
        assert_eq!(path.to_string(), "title");
    }

    #[test]
    fn test_parse_nested() {
        let path: FieldPath = "cited_by.value".parse().unwrap();
        assert_eq!(path, FieldPath::nested("cited_by", "value"));
        assert_eq!(path.to_string(), "cited_by.value");
    }

    #[test]
    fn test_parse_rejects_empty_parts() {
        assert!(matches!(
            FieldPath::parse(""),
            Err(ExtractError::EmptyKey { .. })
        ));
        assert!(matches!(
            FieldPath::parse(".value"),
            Err(ExtractError::EmptyKey { .. })
        ));
        assert!(matches!(
            FieldPath::parse("cited_by."),
            Err(ExtractError::EmptyKey { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_deep_paths() {
        let err = FieldPath::parse("a.b.c").unwrap_err();
        assert!(matches!(err, ExtractError::PathTooDeep { .. }));
        assert!(err.to_string().contains("a.b.c"));
    }

    #[test]
    fn test_lookup_dispatch() {
        let block = r#"{"title": "A", "cited_by": {"value": 9}, "year": "2020"}"#;
        assert_eq!(FieldPath::top_level("title").string_in(block), Some("A"));
        assert_eq!(
            FieldPath::nested("cited_by", "value").int_in(block),
            Some(9)
        );
        assert_eq!(FieldPath::nested("cited_by", "value").string_in(block), None);
        assert_eq!(FieldPath::top_level("year").int_in(block), None);
    }
}
