//! Fetch an author, map the payload and persist the leading articles.

use crate::mapping::{map_payload, top_articles};
use crate::source::{AuthorQuery, AuthorSource};
use crate::store::{ArticleStore, researcher_tag};
use crate::{Author, CoreError};

/// What happened to the articles on the persistence side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Nothing to save, or saving was not requested.
    Skipped,
    Saved { count: usize, researcher_tag: String },
    /// The write failed and was rolled back; the author is still usable.
    Failed { error: String },
}

/// Result of [`fetch_and_persist`].
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub author: Author,
    pub persist: PersistOutcome,
}

/// Fetch the payload for `query` and map it.
///
/// Fails on transport errors and on payloads carrying an API `error`; a
/// payload that merely lacks fields maps to placeholders and an empty list.
pub async fn fetch_author(
    source: &dyn AuthorSource,
    query: &AuthorQuery,
) -> Result<Author, CoreError> {
    let payload = source.fetch_author_json(query).await?;
    let author = map_payload(&payload).inspect_err(|e| {
        tracing::warn!(source = source.name(), author_id = %query.author_id, error = %e, "payload reported an error");
    })?;
    tracing::info!(
        author_id = %query.author_id,
        name = %author.name,
        articles = author.articles.len(),
        "author mapped"
    );
    Ok(author)
}

/// Save the first `limit` articles of `author` in one transaction, tagged
/// for `author_id`. Never fails: a storage error is logged and reported in the
/// outcome.
pub fn persist_top_articles(
    store: &mut dyn ArticleStore,
    author: &Author,
    author_id: &str,
    limit: usize,
) -> PersistOutcome {
    let articles = top_articles(&author.articles, limit);
    if articles.is_empty() {
        return PersistOutcome::Skipped;
    }
    let tag = researcher_tag(author_id);
    match store.save_all(articles, &tag) {
        Ok(count) => {
            tracing::info!(count, tag = %tag, "articles saved");
            PersistOutcome::Saved {
                count,
                researcher_tag: tag,
            }
        }
        Err(e) => {
            tracing::warn!(tag = %tag, error = %e, "failed to save articles");
            PersistOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}

/// Fetch, map and (when a store is given) persist up to `limit` articles.
pub async fn fetch_and_persist(
    source: &dyn AuthorSource,
    store: Option<&mut dyn ArticleStore>,
    query: &AuthorQuery,
    limit: usize,
) -> Result<FetchOutcome, CoreError> {
    let author = fetch_author(source, query).await?;
    let persist = match store {
        Some(store) => persist_top_articles(store, &author, &query.author_id, limit),
        None => PersistOutcome::Skipped,
    };
    Ok(FetchOutcome { author, persist })
}
