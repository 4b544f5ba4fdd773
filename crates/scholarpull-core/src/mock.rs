//! In-memory test doubles for [`AuthorSource`] and [`ArticleStore`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::source::{AuthorQuery, AuthorSource};
use crate::store::{ArticleStore, has_researcher_tag, keywords_with_tag};
use crate::{Article, ArticleRecord, CoreError};

/// A configurable mock response for [`MockSource`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Return this payload text.
    Payload(String),
    /// Simulate a non-2xx response.
    HttpStatus { status: u16, body: String },
    /// Simulate a 429.
    RateLimited,
}

/// An [`AuthorSource`] that replays a fixed response and records the queries
/// it was asked for.
pub struct MockSource {
    response: MockResponse,
    queries: Mutex<Vec<AuthorQuery>>,
    call_count: AtomicUsize,
}

impl MockSource {
    pub fn new(response: MockResponse) -> Self {
        Self {
            response,
            queries: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn payload(text: impl Into<String>) -> Self {
        Self::new(MockResponse::Payload(text.into()))
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<AuthorQuery> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }
}

impl AuthorSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch_author_json<'a>(
        &'a self,
        query: &'a AuthorQuery,
    ) -> Pin<Box<dyn Future<Output = Result<String, CoreError>> + Send + 'a>> {
        Box::pin(async move {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut queries) = self.queries.lock() {
                queries.push(query.clone());
            }
            match &self.response {
                MockResponse::Payload(text) => Ok(text.clone()),
                MockResponse::HttpStatus { status, body } => Err(CoreError::HttpStatus {
                    status: *status,
                    body: body.clone(),
                }),
                MockResponse::RateLimited => Err(CoreError::RateLimited { retry_after: None }),
            }
        })
    }
}

/// An [`ArticleStore`] backed by a vector. Can be told to fail writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Vec<ArticleRecord>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes all fail, for exercising error paths.
    pub fn failing() -> Self {
        Self {
            rows: Vec::new(),
            fail_writes: true,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn record_for(&self, article: &Article, researcher_tag: &str) -> ArticleRecord {
        ArticleRecord {
            id: self.rows.len() as i64 + 1,
            title: article.title.clone(),
            authors: article.authors.clone().unwrap_or_default(),
            publication_date: article.year.clone().unwrap_or_default(),
            abstract_text: article.abstract_text.clone().unwrap_or_default(),
            link: article.link.clone().unwrap_or_default(),
            keywords: keywords_with_tag(article.keywords.as_deref(), researcher_tag),
            cited_by: article.cited_by,
        }
    }
}

impl ArticleStore for MemoryStore {
    fn save(&mut self, article: &Article, researcher_tag: &str) -> Result<i64, CoreError> {
        if self.fail_writes {
            return Err(CoreError::Store("writes disabled".into()));
        }
        let record = self.record_for(article, researcher_tag);
        let id = record.id;
        self.rows.push(record);
        Ok(id)
    }

    fn save_all(&mut self, articles: &[Article], researcher_tag: &str) -> Result<usize, CoreError> {
        if self.fail_writes {
            return Err(CoreError::Store("writes disabled".into()));
        }
        for article in articles {
            self.save(article, researcher_tag)?;
        }
        Ok(articles.len())
    }

    fn find_by_author_tag(&self, author_id: &str) -> Result<Vec<ArticleRecord>, CoreError> {
        Ok(self
            .rows
            .iter()
            .filter(|r| has_researcher_tag(&r.keywords, author_id))
            .cloned()
            .collect())
    }

    fn find_all(&self) -> Result<Vec<ArticleRecord>, CoreError> {
        Ok(self.rows.clone())
    }
}
