use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;
use scholarpull_core::{ArticleRecord, Author, PersistOutcome};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or("-")
}

/// Print an author profile and its articles.
pub fn render_author(w: &mut dyn Write, author: &Author, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", "=== Google Scholar Author ===".bold())?;
        writeln!(w, "Name: {}", author.name.cyan())?;
    } else {
        writeln!(w, "=== Google Scholar Author ===")?;
        writeln!(w, "Name: {}", author.name)?;
    }
    writeln!(w, "Affiliations: {}", author.affiliations)?;
    writeln!(w, "Articles:")?;

    if author.articles.is_empty() {
        if color.enabled() {
            writeln!(w, "  {}", "(no articles found)".dimmed())?;
        } else {
            writeln!(w, "  (no articles found)")?;
        }
        return Ok(());
    }

    for article in &author.articles {
        let title = or_dash(Some(&article.title));
        let year = or_dash(article.year.as_deref());
        let cited = article.cited_by.unwrap_or(0);
        if color.enabled() {
            writeln!(
                w,
                "  - {} ({}) | {}",
                title,
                year,
                format!("cited_by={}", cited).dimmed()
            )?;
        } else {
            writeln!(w, "  - {} ({}) | cited_by={}", title, year, cited)?;
        }
    }
    Ok(())
}

/// Print a failure as `[ERROR] <message>`.
pub fn render_error(w: &mut dyn Write, message: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", "[ERROR]".red().bold(), message)
    } else {
        writeln!(w, "[ERROR] {}", message)
    }
}

/// Report what happened to the persisted articles.
pub fn render_persist(
    w: &mut dyn Write,
    outcome: &PersistOutcome,
    db_path: &Path,
    color: ColorMode,
) -> std::io::Result<()> {
    match outcome {
        PersistOutcome::Skipped => Ok(()),
        PersistOutcome::Saved {
            count,
            researcher_tag,
        } => {
            let msg = format!(
                "Saved {} article(s) to {} ({})",
                count,
                db_path.display(),
                researcher_tag
            );
            if color.enabled() {
                writeln!(w, "{}", msg.green())
            } else {
                writeln!(w, "{}", msg)
            }
        }
        PersistOutcome::Failed { error } => {
            if color.enabled() {
                writeln!(w, "{} could not save articles: {}", "WARNING:".yellow(), error)
            } else {
                writeln!(w, "WARNING: could not save articles: {}", error)
            }
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
        out.push_str("...");
        out
    }
}

const COLUMNS: [(&str, usize); 7] = [
    ("id", 6),
    ("title", 48),
    ("authors", 28),
    ("publication_date", 16),
    ("cited_by", 8),
    ("link", 40),
    ("keywords", 32),
];

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}

fn record_cells(record: &ArticleRecord) -> [String; 7] {
    [
        record.id.to_string(),
        record.title.clone(),
        record.authors.clone(),
        record.publication_date.clone(),
        record
            .cited_by
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string()),
        record.link.clone(),
        record.keywords.clone(),
    ]
}

/// Print stored records as a fixed-width table. Long cells are truncated.
pub fn render_records(
    w: &mut dyn Write,
    records: &[ArticleRecord],
    color: ColorMode,
) -> std::io::Result<()> {
    if records.is_empty() {
        return writeln!(w, "(no stored articles)");
    }

    let header: Vec<String> = COLUMNS.iter().map(|(name, width)| pad(name, *width)).collect();
    let header = header.join("  ");
    if color.enabled() {
        writeln!(w, "{}", header.trim_end().bold())?;
    } else {
        writeln!(w, "{}", header.trim_end())?;
    }

    for record in records {
        let cells = record_cells(record);
        let line: Vec<String> = cells
            .iter()
            .zip(COLUMNS.iter())
            .map(|(cell, (_, width))| pad(&truncate(cell, *width), *width))
            .collect();
        writeln!(w, "{}", line.join("  ").trim_end())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scholarpull_core::Article;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn author_with_articles() {
        let author = Author {
            name: "Cliff Meyer".into(),
            affiliations: "Dana-Farber".into(),
            articles: vec![
                Article::new("MACS", Some("2008".into()), Some(14215)),
                Article::new("Preprint", Some("".into()), None),
            ],
        };
        let out = render(|w| render_author(w, &author, ColorMode(false)));
        assert_eq!(
            out,
            "=== Google Scholar Author ===\n\
             Name: Cliff Meyer\n\
             Affiliations: Dana-Farber\n\
             Articles:\n  \
             - MACS (2008) | cited_by=14215\n  \
             - Preprint (-) | cited_by=0\n"
        );
    }

    #[test]
    fn author_without_articles() {
        let author = Author {
            name: "(unknown)".into(),
            affiliations: "(unknown)".into(),
            articles: vec![],
        };
        let out = render(|w| render_author(w, &author, ColorMode(false)));
        assert!(out.ends_with("Articles:\n  (no articles found)\n"));
        assert!(out.contains("Name: (unknown)\n"));
    }

    #[test]
    fn error_line() {
        let out = render(|w| render_error(w, "API error: Invalid API key.", ColorMode(false)));
        assert_eq!(out, "[ERROR] API error: Invalid API key.\n");
    }

    #[test]
    fn persist_lines() {
        let saved = PersistOutcome::Saved {
            count: 3,
            researcher_tag: "author:x".into(),
        };
        let out = render(|w| render_persist(w, &saved, Path::new("a.db"), ColorMode(false)));
        assert_eq!(out, "Saved 3 article(s) to a.db (author:x)\n");

        let out = render(|w| {
            render_persist(w, &PersistOutcome::Skipped, Path::new("a.db"), ColorMode(false))
        });
        assert!(out.is_empty());
    }

    #[test]
    fn records_table() {
        let records = vec![ArticleRecord {
            id: 1,
            title: "A very long title that keeps going well past the width of its column".into(),
            authors: "Y Zhang".into(),
            publication_date: "2008".into(),
            abstract_text: String::new(),
            link: "https://example.org".into(),
            keywords: "author:x".into(),
            cited_by: None,
        }];
        let out = render(|w| render_records(w, &records, ColorMode(false)));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("id      title"));
        assert!(lines[1].contains("A very long title that keeps going well past ..."));
        assert!(lines[1].ends_with("author:x"));
        assert!(lines[1].contains("  -  "));

        let out = render(|w| render_records(w, &[], ColorMode(false)));
        assert_eq!(out, "(no stored articles)\n");
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("héllo", 5), "héllo");
        assert_eq!(truncate("héllo world", 8), "héllo...");
    }
}
