//! Map a raw author payload into [`Author`] and [`Article`] values.
//!
//! All field access goes through `scholarpull_extract`; nothing here parses
//! JSON. Blank strings are treated like missing ones.

use scholarpull_extract::{
    extract_array_objects, extract_field_string, extract_nested_int, extract_nested_string,
    extract_top_level_string,
};

use crate::{Article, Author, CoreError};

/// Shown in place of a missing author name or affiliation.
pub const UNKNOWN_PLACEHOLDER: &str = "(unknown)";

/// Number of articles persisted per researcher.
pub const DEFAULT_PERSIST_LIMIT: usize = 3;

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(String::from)
}

/// The API-level error message carried in the payload, if any.
pub fn api_error(payload: &str) -> Option<String> {
    owned(non_blank(extract_top_level_string(payload, "error")))
}

/// Map one element of the `articles` array. Returns `None` when the block has
/// no usable title; such records are skipped rather than given a default.
pub fn map_article(block: &str) -> Option<Article> {
    let title = non_blank(extract_field_string(block, "title"))?;
    Some(Article {
        title: title.to_string(),
        year: owned(extract_field_string(block, "year")),
        cited_by: extract_nested_int(block, "cited_by", "value"),
        authors: owned(extract_field_string(block, "authors")),
        abstract_text: owned(extract_field_string(block, "snippet")),
        link: owned(extract_field_string(block, "link")),
        keywords: None,
    })
}

/// Map the articles of a payload, in listing order, skipping untitled ones.
pub fn map_articles(payload: &str) -> Vec<Article> {
    let blocks = extract_array_objects(payload, "articles");
    let total = blocks.len();
    let articles: Vec<Article> = blocks.into_iter().filter_map(map_article).collect();
    if articles.len() < total {
        tracing::debug!(
            total,
            kept = articles.len(),
            "skipped article blocks without a title"
        );
    }
    articles
}

/// Map a payload into an [`Author`], substituting [`UNKNOWN_PLACEHOLDER`] for
/// a missing name or affiliation. Does not look at the `error` field.
pub fn map_author(payload: &str) -> Author {
    let name = non_blank(extract_nested_string(payload, "author", "name"));
    let affiliations = non_blank(extract_nested_string(payload, "author", "affiliations"));
    Author {
        name: name.unwrap_or(UNKNOWN_PLACEHOLDER).to_string(),
        affiliations: affiliations.unwrap_or(UNKNOWN_PLACEHOLDER).to_string(),
        articles: map_articles(payload),
    }
}

/// Check the payload for an API error, then map it.
pub fn map_payload(payload: &str) -> Result<Author, CoreError> {
    if let Some(message) = api_error(payload) {
        return Err(CoreError::Api(message));
    }
    Ok(map_author(payload))
}

/// The first `limit` articles, keeping listing order.
pub fn top_articles(articles: &[Article], limit: usize) -> &[Article] {
    &articles[..articles.len().min(limit)]
}
