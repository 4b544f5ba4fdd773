//! Persistence seam for mapped articles.

use crate::{Article, ArticleRecord, CoreError};

/// Storage for article records, keyed by a researcher tag kept in the
/// `keywords` column.
pub trait ArticleStore {
    /// Insert one article, returning its row id.
    fn save(&mut self, article: &Article, researcher_tag: &str) -> Result<i64, CoreError>;

    /// Insert all articles atomically: either every row is written or none is.
    fn save_all(&mut self, articles: &[Article], researcher_tag: &str) -> Result<usize, CoreError>;

    /// Rows tagged with [`researcher_tag(author_id)`](researcher_tag), oldest first.
    fn find_by_author_tag(&self, author_id: &str) -> Result<Vec<ArticleRecord>, CoreError>;

    /// Every stored row, oldest first.
    fn find_all(&self) -> Result<Vec<ArticleRecord>, CoreError>;
}

/// Tag distinguishing which researcher an article was fetched for.
pub fn researcher_tag(author_id: &str) -> String {
    format!("author:{}", author_id)
}

/// Value of the `keywords` column: the article's keywords with the researcher
/// tag appended, or the tag alone.
pub fn keywords_with_tag(keywords: Option<&str>, researcher_tag: &str) -> String {
    match keywords.filter(|k| !k.trim().is_empty()) {
        Some(k) => format!("{},{}", k, researcher_tag),
        None => researcher_tag.to_string(),
    }
}

/// Whether a `keywords` value carries the tag for `author_id`. The tag is
/// always the last comma-separated element, so `author:ab` does not match a
/// row tagged `author:abc`.
pub fn has_researcher_tag(keywords: &str, author_id: &str) -> bool {
    let tag = researcher_tag(author_id);
    keywords == tag
        || keywords
            .strip_suffix(tag.as_str())
            .is_some_and(|rest| rest.ends_with(','))
}
