//! On-disk behaviour of the article repository.

use scholarpull_core::mock::MockSource;
use scholarpull_core::{Article, ArticleStore, AuthorQuery, PersistOutcome, fetch_and_persist};
use scholarpull_store::ArticleRepository;

const PAYLOAD: &str =
    include_str!("../../scholarpull-extract/tests/fixtures/google_scholar_author.json");

#[test]
fn open_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a").join("b").join("articles.db");
    let repo = ArticleRepository::open(&path).unwrap();
    assert!(path.exists());
    assert_eq!(repo.path(), Some(path.as_path()));
    assert_eq!(repo.count().unwrap(), 0);
}

#[test]
fn rows_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("articles.db");
    {
        let mut repo = ArticleRepository::open(&path).unwrap();
        let article = Article {
            authors: Some("G Hopper".into()),
            link: Some("https://example.org/cobol".into()),
            abstract_text: Some("A compiler.".into()),
            ..Article::new("COBOL", Some("1959".into()), Some(42))
        };
        repo.save(&article, "author:gh").unwrap();
    }
    let repo = ArticleRepository::open(&path).unwrap();
    let rows = repo.find_all().unwrap();
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.title, "COBOL");
    assert_eq!(row.authors, "G Hopper");
    assert_eq!(row.publication_date, "1959");
    assert_eq!(row.abstract_text, "A compiler.");
    assert_eq!(row.link, "https://example.org/cobol");
    assert_eq!(row.keywords, "author:gh");
    assert_eq!(row.cited_by, Some(42));
}

#[tokio::test]
async fn fetch_flow_persists_top_three() {
    let dir = tempfile::tempdir().unwrap();
    let mut repo = ArticleRepository::open(&dir.path().join("articles.db")).unwrap();
    let source = MockSource::payload(PAYLOAD);

    let outcome = fetch_and_persist(&source, Some(&mut repo), &AuthorQuery::new("LSsXyncAAAAJ"), 3)
        .await
        .unwrap();
    assert!(matches!(outcome.persist, PersistOutcome::Saved { count: 3, .. }));

    let rows = repo.find_by_author_tag("LSsXyncAAAAJ").unwrap();
    let cited: Vec<Option<u64>> = rows.iter().map(|r| r.cited_by).collect();
    assert_eq!(cited, vec![Some(14215), Some(1857), Some(1033)]);
    assert_eq!(rows[1].publication_date, "2006");

    // A second run appends another three rows; nothing is deduplicated.
    fetch_and_persist(&source, Some(&mut repo), &AuthorQuery::new("LSsXyncAAAAJ"), 3)
        .await
        .unwrap();
    assert_eq!(repo.count().unwrap(), 6);
}
