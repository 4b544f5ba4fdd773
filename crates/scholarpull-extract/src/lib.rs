//! Field extraction from JSON-shaped search payloads without a JSON parser.
//!
//! The payloads this crate reads have a known, shallow shape: a few top-level
//! scalars, a top-level `"author"` object and an `"articles"` array of flat
//! objects that may each hold one sub-object (`"cited_by": {"value": 12}`).
//! Rather than tokenizing, each lookup is a literal-key pattern match over the
//! raw text:
//!
//! - [`scalar`]: `"name": "value"` and `"name": 123` pairs
//! - [`object`]: lazy (non-nesting) scoping of a named `{...}` body
//! - [`array`]: lazy scoping of a named `[...]` body, then one-level-aware
//!   splitting of that body into `{...}` blocks
//!
//! Every operation is a pure function of its inputs. Missing keys, wrong value
//! types and unbalanced braces all come back as `None` or an empty vector;
//! nothing here returns an error for bad data. Shapes outside the supported
//! profile (escaped quotes, arrays nested in arrays, objects nested two deep)
//! can produce truncated or missing results.

pub mod array;
pub mod object;
mod path;
pub mod scalar;
mod span;

use thiserror::Error;

pub use path::FieldPath;
pub use span::Span;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("empty key in field path {path:?}")]
    EmptyKey { path: String },
    #[error("field path {path:?} nests deeper than one object")]
    PathTooDeep { path: String },
}

/// A top-level string field such as `"error"`.
///
/// "Top-level" is nominal: the first `"field": "..."` pair anywhere in the
/// text wins, including one inside a nested object that appears earlier.
pub fn extract_top_level_string<'t>(text: &'t str, field: &str) -> Option<&'t str> {
    scalar::match_string(text, field)
}

/// `object.field` as a string, e.g. `author.name`.
pub fn extract_nested_string<'t>(text: &'t str, object: &str, field: &str) -> Option<&'t str> {
    object::find_nested_string(text, object, field)
}

/// `object.field` as an unsigned integer, e.g. `cited_by.value`.
pub fn extract_nested_int(text: &str, object: &str, field: &str) -> Option<u64> {
    object::find_nested_int(text, object, field)
}

/// The object blocks of a named array, in listing order, as text borrowed from
/// `text`. Feed each block to [`extract_field_string`] and friends.
pub fn extract_array_objects<'t>(text: &'t str, array_name: &str) -> Vec<&'t str> {
    array::find_array_blocks(text, array_name)
        .into_iter()
        .map(|span| span.slice(text))
        .collect()
}

/// A string field of a single object block.
pub fn extract_field_string<'t>(block: &'t str, field: &str) -> Option<&'t str> {
    scalar::match_string(block, field)
}

/// An unsigned integer field of a single object block.
pub fn extract_field_int(block: &str, field: &str) -> Option<u64> {
    scalar::match_int(block, field)
}
