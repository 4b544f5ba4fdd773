//! The `extract` subcommand: run the field extractor over a saved payload.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use scholarpull_extract::{ExtractError, FieldPath, extract_array_objects};

/// `articles[]` or `articles[].cited_by.value`.
static ARRAY_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^.\[\]]+)\[\](?:\.(.+))?$").unwrap());

/// What an `extract` path selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractTarget {
    /// A top-level field or a field of a named object.
    Field(FieldPath),
    /// Every object block of an array.
    Blocks { array: String },
    /// One field looked up inside each object block of an array.
    BlockField { array: String, path: FieldPath },
}

impl FromStr for ExtractTarget {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match ARRAY_PATH_RE.captures(s) {
            Some(caps) => {
                let array = caps[1].to_string();
                match caps.get(2) {
                    Some(rest) => Ok(ExtractTarget::BlockField {
                        array,
                        path: FieldPath::parse(rest.as_str())?,
                    }),
                    None => Ok(ExtractTarget::Blocks { array }),
                }
            }
            None => Ok(ExtractTarget::Field(FieldPath::parse(s)?)),
        }
    }
}

impl fmt::Display for ExtractTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractTarget::Field(path) => write!(f, "{}", path),
            ExtractTarget::Blocks { array } => write!(f, "{}[]", array),
            ExtractTarget::BlockField { array, path } => write!(f, "{}[].{}", array, path),
        }
    }
}

fn lookup(text: &str, path: &FieldPath, as_int: bool) -> Option<String> {
    if as_int {
        path.int_in(text).map(|n| n.to_string())
    } else {
        path.string_in(text).map(String::from)
    }
}

/// Evaluate `target` against `text`. A field target yields exactly one entry;
/// array targets yield one entry per block, in order.
pub fn evaluate(text: &str, target: &ExtractTarget, as_int: bool) -> Vec<Option<String>> {
    match target {
        ExtractTarget::Field(path) => vec![lookup(text, path, as_int)],
        ExtractTarget::Blocks { array } => extract_array_objects(text, array)
            .into_iter()
            .map(|block| Some(block.to_string()))
            .collect(),
        ExtractTarget::BlockField { array, path } => extract_array_objects(text, array)
            .into_iter()
            .map(|block| lookup(block, path, as_int))
            .collect(),
    }
}
