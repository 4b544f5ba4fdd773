use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub mod config_file;
pub mod flow;
pub mod mapping;
pub mod mock;
pub mod serpapi;
pub mod source;
pub mod store;

// Re-export for convenience
pub use flow::{
    FetchOutcome, PersistOutcome, fetch_and_persist, fetch_author, persist_top_articles,
};
pub use mapping::{DEFAULT_PERSIST_LIMIT, UNKNOWN_PLACEHOLDER, map_author, map_payload};
pub use serpapi::SerpApiClient;
pub use source::{AuthorQuery, AuthorSource};
pub use store::{ArticleStore, researcher_tag};

/// A publication listed on an author's profile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Article {
    pub title: String,
    pub year: Option<String>,
    pub cited_by: Option<u64>,
    /// Comma-separated author list, as the provider formats it.
    pub authors: Option<String>,
    /// Short summary; the search API calls it `snippet`.
    pub abstract_text: Option<String>,
    pub link: Option<String>,
    pub keywords: Option<String>,
}

impl Article {
    pub fn new(title: impl Into<String>, year: Option<String>, cited_by: Option<u64>) -> Self {
        Self {
            title: title.into(),
            year,
            cited_by,
            ..Default::default()
        }
    }
}

/// An author profile with its listed articles, in listing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub affiliations: String,
    pub articles: Vec<Article>,
}

/// A stored article row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    pub id: i64,
    pub title: String,
    pub authors: String,
    pub publication_date: String,
    pub abstract_text: String,
    pub link: String,
    pub keywords: String,
    pub cited_by: Option<u64>,
}

/// Resolved settings for one run. Built by [`config_file::resolve`], then
/// overridden by command-line flags.
#[derive(Clone)]
pub struct Config {
    pub serpapi_key: Option<String>,
    pub base_url: String,
    pub num: u32,
    pub hl: String,
    pub sort: String,
    pub no_cache: bool,
    pub db_path: PathBuf,
    /// How many leading articles are persisted per author.
    pub persist_limit: usize,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("serpapi_key", &self.serpapi_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("num", &self.num)
            .field("hl", &self.hl)
            .field("sort", &self.sort)
            .field("no_cache", &self.no_cache)
            .field("db_path", &self.db_path)
            .field("persist_limit", &self.persist_limit)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serpapi_key: None,
            base_url: serpapi::DEFAULT_BASE_URL.to_string(),
            num: 10,
            hl: "en".to_string(),
            sort: "pubdate".to_string(),
            no_cache: false,
            db_path: default_db_path(),
            persist_limit: DEFAULT_PERSIST_LIMIT,
        }
    }
}

impl Config {
    /// The lookup for `author_id` under these settings, starting at the first article.
    pub fn query(&self, author_id: impl Into<String>) -> AuthorQuery {
        AuthorQuery {
            author_id: author_id.into(),
            start: Some(0),
            num: Some(self.num),
            hl: Some(self.hl.clone()),
            sort: Some(self.sort.clone()),
            no_cache: self.no_cache,
        }
    }
}

/// `<data_dir>/scholarpull/articles.db`, or `scholarpull.db` in the working
/// directory when the platform has no data directory.
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("scholarpull").join("articles.db"))
        .unwrap_or_else(|| PathBuf::from("scholarpull.db"))
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("rate limited (429){}", retry_suffix(.retry_after))]
    RateLimited { retry_after: Option<Duration> },
    #[error("API error: {0}")]
    Api(String),
    #[error("storage error: {0}")]
    Store(String),
    #[error("config error: {0}")]
    Config(String),
}

fn retry_suffix(retry_after: &Option<Duration>) -> String {
    retry_after
        .as_ref()
        .map(|d| format!(", retry after {}s", d.as_secs()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_new_leaves_optionals_empty() {
        let article = Article::new("Title", Some("2020".into()), Some(3));
        assert_eq!(article.title, "Title");
        assert_eq!(article.cited_by, Some(3));
        assert!(article.link.is_none());
        assert!(article.keywords.is_none());
    }

    #[test]
    fn test_config_query_and_debug() {
        let config = Config {
            serpapi_key: Some("super-secret".into()),
            num: 20,
            sort: "title".into(),
            ..Default::default()
        };
        let query = config.query("abc");
        assert_eq!(query.num, Some(20));
        assert_eq!(query.sort.as_deref(), Some("title"));
        assert_eq!(query.start, Some(0));
        assert!(!format!("{:?}", config).contains("super-secret"));
    }

    #[test]
    fn test_error_messages() {
        let err = CoreError::RateLimited {
            retry_after: Some(Duration::from_secs(10)),
        };
        assert_eq!(err.to_string(), "rate limited (429), retry after 10s");
        let err = CoreError::RateLimited { retry_after: None };
        assert_eq!(err.to_string(), "rate limited (429)");
        let err = CoreError::HttpStatus {
            status: 401,
            body: "nope".into(),
        };
        assert_eq!(err.to_string(), "HTTP 401: nope");
    }
}
