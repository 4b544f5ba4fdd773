//! SQLite persistence for article records.
//!
//! [`ArticleRepository`] implements [`scholarpull_core::ArticleStore`]; rows are
//! tagged with the researcher they were fetched for through the `keywords`
//! column.

mod db;

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use thiserror::Error;

use scholarpull_core::store::researcher_tag;
use scholarpull_core::{Article, ArticleRecord, ArticleStore, CoreError};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("citation count {0} does not fit in an SQLite integer")]
    CitationOverflow(u64),
}

impl From<StoreError> for CoreError {
    fn from(e: StoreError) -> Self {
        CoreError::Store(e.to_string())
    }
}

/// Handle to an opened article database.
pub struct ArticleRepository {
    conn: Connection,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for ArticleRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleRepository")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl ArticleRepository {
    /// Open (or create) the database at `path`, creating parent directories
    /// and the schema as needed.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        db::init_database(&conn)?;
        tracing::debug!(path = %path.display(), "article database opened");
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// A private in-memory database, discarded on drop.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        db::init_database(&conn)?;
        Ok(Self { conn, path: None })
    }

    /// On-disk location, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        db::count_articles(&self.conn)
    }

    pub fn insert(&mut self, article: &Article, researcher_tag: &str) -> Result<i64, StoreError> {
        db::insert_article(&self.conn, article, researcher_tag)
    }

    /// Insert every article in one transaction; on error nothing is written.
    pub fn insert_all(
        &mut self,
        articles: &[Article],
        researcher_tag: &str,
    ) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        for article in articles {
            db::insert_article(&tx, article, researcher_tag)?;
        }
        tx.commit()?;
        tracing::debug!(count = articles.len(), tag = %researcher_tag, "articles committed");
        Ok(articles.len())
    }

    pub fn by_author(&self, author_id: &str) -> Result<Vec<ArticleRecord>, StoreError> {
        db::select_by_tag(&self.conn, &researcher_tag(author_id))
    }

    pub fn all(&self) -> Result<Vec<ArticleRecord>, StoreError> {
        db::select_all(&self.conn)
    }
}

impl ArticleStore for ArticleRepository {
    fn save(&mut self, article: &Article, researcher_tag: &str) -> Result<i64, CoreError> {
        Ok(self.insert(article, researcher_tag)?)
    }

    fn save_all(&mut self, articles: &[Article], researcher_tag: &str) -> Result<usize, CoreError> {
        Ok(self.insert_all(articles, researcher_tag)?)
    }

    fn find_by_author_tag(&self, author_id: &str) -> Result<Vec<ArticleRecord>, CoreError> {
        Ok(self.by_author(author_id)?)
    }

    fn find_all(&self) -> Result<Vec<ArticleRecord>, CoreError> {
        Ok(self.all()?)
    }
}
