//! Markdown export of the visible articles and their summaries.

use chrono::{DateTime, Local, TimeZone};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::storage::Article;
use crate::util::write_atomic;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write export file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Write `articles` to `<dir>/toadman_export_YYYYmmdd_HHMMSS.md`.
///
/// `summaries` is keyed by article url; articles without one get no summary
/// section. Returns the path written.
pub fn export_to_markdown(
    articles: &[Article],
    summaries: &HashMap<String, String>,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    export_to_markdown_at(articles, summaries, dir, &Local::now())
}

pub fn export_to_markdown_at<Tz: TimeZone>(
    articles: &[Article],
    summaries: &HashMap<String, String>,
    dir: &Path,
    now: &DateTime<Tz>,
) -> Result<PathBuf, ExportError>
where
    Tz::Offset: std::fmt::Display,
{
    let io_err = |source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    };
    std::fs::create_dir_all(dir).map_err(io_err)?;

    let path = dir.join(format!("toadman_export_{}.md", now.format("%Y%m%d_%H%M%S")));
    let content = render_markdown(articles, summaries, now);

    write_atomic(&path, content.as_bytes()).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    tracing::info!(path = %path.display(), articles = articles.len(), "Exported articles");
    Ok(path)
}

/// The markdown document for `articles`, generated at `now`.
pub fn render_markdown<Tz: TimeZone>(
    articles: &[Article],
    summaries: &HashMap<String, String>,
    now: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    let tz = now.timezone();

    // Writing to a String cannot fail
    let _ = write!(
        out,
        "# Toadman News Export\nGenerated: {}\n\nTotal Articles: {}\n\n---\n\n",
        now.format(TIMESTAMP_FORMAT),
        articles.len()
    );

    for article in articles {
        let published = article
            .published
            .map(|ts| ts.with_timezone(&tz).format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let _ = write!(
            out,
            "## {}\n\n**Source:** {}  \n**Category:** {}  \n**Published:** {}  \n**URL:** [{}]({})\n\n",
            article.title, article.source, article.category, published, article.url, article.url
        );

        if let Some(summary) = summaries.get(&article.url) {
            let _ = write!(out, "### AI Summary\n\n{}\n\n", summary);
        }

        let _ = write!(out, "### Content\n\n{}\n\n---\n\n", article.snippet);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 14, 5, 9).unwrap()
    }

    fn articles() -> Vec<Article> {
        vec![
            Article::new(
                "Codex GA",
                "https://openai.com/codex",
                Some(Utc.with_ymd_and_hms(2025, 6, 9, 8, 0, 0).unwrap()),
                "OpenAI",
                "Snippet one",
                "Codex",
            ),
            Article::new("Undated", "https://x/u", None, "Claude Log", "", "Claude Code"),
        ]
    }

    #[test]
    fn test_render_layout() {
        let mut summaries = HashMap::new();
        summaries.insert("https://openai.com/codex".to_string(), "- point".to_string());

        let md = render_markdown(&articles(), &summaries, &now());
        let expected = "# Toadman News Export\n\
Generated: 2025-06-10 14:05:09\n\
\n\
Total Articles: 2\n\
\n\
---\n\
\n\
## Codex GA\n\
\n\
**Source:** OpenAI  \n\
**Category:** Codex  \n\
**Published:** 2025-06-09 08:00:00  \n\
**URL:** [https://openai.com/codex](https://openai.com/codex)\n\
\n\
### AI Summary\n\
\n\
- point\n\
\n\
### Content\n\
\n\
Snippet one\n\
\n\
---\n\
\n\
## Undated\n\
\n\
**Source:** Claude Log  \n\
**Category:** Claude Code  \n\
**Published:** Unknown  \n\
**URL:** [https://x/u](https://x/u)\n\
\n\
### Content\n\
\n\
\n\
\n\
---\n\
\n";
        assert_eq!(md, expected);
    }

    #[test]
    fn test_export_writes_timestamped_file() {
        let dir = std::env::temp_dir().join("toadman_export_test_write");
        std::fs::remove_dir_all(&dir).ok();

        let path = export_to_markdown_at(&articles(), &HashMap::new(), &dir, &now()).unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("toadman_export_20250610_140509.md")
        );
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Total Articles: 2"));
        assert!(!content.contains("### AI Summary"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_export_empty_list() {
        let md = render_markdown(&[], &HashMap::new(), &now());
        assert!(md.contains("Total Articles: 0"));
        assert!(!md.contains("## "));
    }
}
