//! SQLite schema and row-level statements for article records.

use rusqlite::{Connection, Row, params};

use scholarpull_core::store::keywords_with_tag;
use scholarpull_core::{Article, ArticleRecord};

use crate::StoreError;

const SELECT_COLUMNS: &str =
    "SELECT id, title, authors, publication_date, abstract, link, keywords, cited_by FROM articles";

/// Initialize the database with the required schema.
/// Sets WAL mode and NORMAL synchronous for on-disk databases.
pub fn init_database(conn: &Connection) -> Result<(), StoreError> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS articles (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            authors TEXT NOT NULL,
            publication_date TEXT NOT NULL,
            abstract TEXT NOT NULL,
            link TEXT NOT NULL,
            keywords TEXT NOT NULL,
            cited_by INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_articles_keywords ON articles(keywords);
        "#,
    )?;

    Ok(())
}

/// Insert one article row, returning its id. Missing text columns are stored
/// as empty strings; a missing citation count stays NULL.
pub fn insert_article(
    conn: &Connection,
    article: &Article,
    researcher_tag: &str,
) -> Result<i64, StoreError> {
    let cited_by = article
        .cited_by
        .map(|n| i64::try_from(n).map_err(|_| StoreError::CitationOverflow(n)))
        .transpose()?;
    let keywords = keywords_with_tag(article.keywords.as_deref(), researcher_tag);

    let mut stmt = conn.prepare_cached(
        "INSERT INTO articles (title, authors, publication_date, abstract, link, keywords, cited_by) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    stmt.execute(params![
        article.title,
        article.authors.as_deref().unwrap_or_default(),
        article.year.as_deref().unwrap_or_default(),
        article.abstract_text.as_deref().unwrap_or_default(),
        article.link.as_deref().unwrap_or_default(),
        keywords,
        cited_by,
    ])?;
    Ok(conn.last_insert_rowid())
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<ArticleRecord> {
    let cited_by: Option<i64> = row.get(7)?;
    Ok(ArticleRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        authors: row.get(2)?,
        publication_date: row.get(3)?,
        abstract_text: row.get(4)?,
        link: row.get(5)?,
        keywords: row.get(6)?,
        cited_by: cited_by.and_then(|n| u64::try_from(n).ok()),
    })
}

/// Rows whose keywords end with the researcher tag, either alone or after a
/// comma. Compared literally, so `_` and `%` in ids are not wildcards.
pub fn select_by_tag(conn: &Connection, researcher_tag: &str) -> Result<Vec<ArticleRecord>, StoreError> {
    let suffix = format!(",{}", researcher_tag);
    let mut stmt = conn.prepare_cached(&format!(
        "{} WHERE keywords = ?1 OR substr(keywords, -length(?2)) = ?2 ORDER BY id",
        SELECT_COLUMNS
    ))?;
    let rows = stmt.query_map(params![researcher_tag, suffix], record_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn select_all(conn: &Connection) -> Result<Vec<ArticleRecord>, StoreError> {
    let mut stmt = conn.prepare_cached(&format!("{} ORDER BY id", SELECT_COLUMNS))?;
    let rows = stmt.query_map([], record_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub fn count_articles(conn: &Connection) -> Result<usize, StoreError> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
    Ok(n as usize)
}
