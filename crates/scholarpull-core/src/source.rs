//! Where author payloads come from.

use std::future::Future;
use std::pin::Pin;

use crate::CoreError;

/// Parameters of one author lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorQuery {
    pub author_id: String,
    /// Offset into the article list.
    pub start: Option<u32>,
    /// Number of articles to return.
    pub num: Option<u32>,
    /// Interface language, e.g. `en`.
    pub hl: Option<String>,
    /// Article ordering: `pubdate` or `title` (provider default is by citations).
    pub sort: Option<String>,
    pub no_cache: bool,
}

impl AuthorQuery {
    /// A query with the defaults the fetch flow uses: first 10 articles,
    /// English, newest first.
    pub fn new(author_id: impl Into<String>) -> Self {
        Self {
            author_id: author_id.into(),
            start: Some(0),
            num: Some(10),
            hl: Some("en".into()),
            sort: Some("pubdate".into()),
            no_cache: false,
        }
    }
}

/// A source of raw author payloads.
///
/// The payload is returned as text; interpreting it is the job of
/// [`crate::mapping`].
pub trait AuthorSource: Send + Sync {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    fn fetch_author_json<'a>(
        &'a self,
        query: &'a AuthorQuery,
    ) -> Pin<Box<dyn Future<Output = Result<String, CoreError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let q = AuthorQuery::new("LSsXyncAAAAJ");
        assert_eq!(q.author_id, "LSsXyncAAAAJ");
        assert_eq!(q.start, Some(0));
        assert_eq!(q.num, Some(10));
        assert_eq!(q.hl.as_deref(), Some("en"));
        assert_eq!(q.sort.as_deref(), Some("pubdate"));
        assert!(!q.no_cache);
    }
}
