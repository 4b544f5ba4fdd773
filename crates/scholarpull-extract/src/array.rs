//! Array segmentation: split the body of a named `[...]` array into the
//! `{...}` object blocks it lists.
//!
//! Two steps, with different notions of "matching delimiter":
//!
//! 1. The array body runs from the `[` after `"name":` to the *first* `]`
//!    (lazy, like [`crate::object`]). Arrays nested inside the array are not
//!    supported and cut the body short.
//! 2. Inside that body, blocks are found with a brace-depth counter that
//!    tolerates exactly one level of nesting: `{"a": {"b": 1}}` is one block,
//!    but a block holding a sub-sub-object cannot close at its own start and
//!    the scan moves on to the next `{`.
//!
//! Braces inside string values are counted like any other brace.

use crate::scalar::{compile, key_prefix};
use crate::span::Span;

/// Deepest brace level a block may reach: its own braces plus one nested pair.
const MAX_BLOCK_DEPTH: usize = 2;

/// Span of the body of the first `"name": [ ... ]` array, excluding the
/// brackets.
pub fn find_array_span(text: &str, name: &str) -> Option<Span> {
    if name.is_empty() {
        return None;
    }
    let re = compile(&format!(r"(?s){}\[(.*?)\]", key_prefix(name)))?;
    let caps = re.captures(text)?;
    caps.get(1).map(Span::from)
}

/// Object blocks of the `"name"` array, in source order, as spans into `text`.
/// Each span starts at a `{` and ends just past its balancing `}`.
///
/// Returns an empty vector when the array is missing or holds no balanced
/// blocks.
pub fn find_array_blocks(text: &str, name: &str) -> Vec<Span> {
    let Some(body) = find_array_span(text, name) else {
        return Vec::new();
    };
    segment_blocks(body.slice(text))
        .into_iter()
        .map(|block| block.offset_by(body.start))
        .collect()
}

/// Scan `body` left to right for balanced `{...}` blocks.
///
/// A block that closes is emitted and scanning resumes after it. A `{` that
/// cannot close within the depth limit (or before the end of the body) is
/// skipped, and scanning resumes at the next `{` after it.
pub fn segment_blocks(body: &str) -> Vec<Span> {
    let bytes = body.as_bytes();
    let mut blocks = Vec::new();
    let mut pos = 0;

    while let Some(offset) = bytes[pos..].iter().position(|&b| b == b'{') {
        let start = pos + offset;
        match close_block(bytes, start) {
            Some(end) => {
                blocks.push(Span::new(start, end));
                pos = end;
            }
            None => pos = start + 1,
        }
    }

    blocks
}

/// Exclusive end of the block opening at `bytes[start]`, or `None` if it
/// nests too deep or never closes.
fn close_block(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        match b {
            b'{' => {
                depth += 1;
                if depth > MAX_BLOCK_DEPTH {
                    return None;
                }
            }
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}
