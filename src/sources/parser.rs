use chrono::{DateTime, Utc};
use feed_rs::parser;

/// One entry of an RSS or Atom document, before categorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: Option<String>,
    /// First link of the entry, empty when the entry has none.
    pub link: String,
    pub published: Option<DateTime<Utc>>,
    /// Summary, falling back to the content body.
    pub summary: Option<String>,
}

pub fn parse_feed(bytes: &[u8]) -> Result<Vec<FeedEntry>, parser::ParseFeedError> {
    let feed = parser::parse(bytes)?;

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            let link = entry
                .links
                .first()
                .map(|l| l.href.trim().to_string())
                .unwrap_or_default();
            let published = entry.published.or(entry.updated);
            let summary = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body))
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
            let title = entry
                .title
                .map(|t| t.content.trim().to_string())
                .filter(|t| !t.is_empty());

            FeedEntry {
                title,
                link,
                published,
                summary,
            }
        })
        .collect();

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rss_items() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Blog</title>
  <item>
    <title>First post</title>
    <link>https://blog.example/1</link>
    <pubDate>Tue, 03 Jun 2025 10:00:00 +0200</pubDate>
    <description>Short summary</description>
  </item>
  <item>
    <link>https://blog.example/2</link>
  </item>
</channel></rss>"#;

        let entries = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title.as_deref(), Some("First post"));
        assert_eq!(entries[0].link, "https://blog.example/1");
        assert_eq!(
            entries[0].published,
            Some(Utc.with_ymd_and_hms(2025, 6, 3, 8, 0, 0).unwrap())
        );
        assert_eq!(entries[0].summary.as_deref(), Some("Short summary"));

        assert_eq!(entries[1].title, None);
        assert_eq!(entries[1].published, None);
        assert_eq!(entries[1].summary, None);
    }

    #[test]
    fn test_parse_atom_uses_content_when_no_summary() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom</title>
  <id>urn:feed</id>
  <updated>2025-06-02T00:00:00Z</updated>
  <entry>
    <title>Atom entry</title>
    <id>urn:entry:1</id>
    <link href="https://atom.example/1"/>
    <updated>2025-06-02T12:30:00Z</updated>
    <content type="text">Body text</content>
  </entry>
</feed>"#;

        let entries = parse_feed(xml.as_bytes()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].link, "https://atom.example/1");
        assert_eq!(
            entries[0].published,
            Some(Utc.with_ymd_and_hms(2025, 6, 2, 12, 30, 0).unwrap())
        );
        assert_eq!(entries[0].summary.as_deref(), Some("Body text"));
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(parse_feed(b"<not valid xml").is_err());
    }
}
