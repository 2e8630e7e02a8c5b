use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder title for entries whose source provides none.
pub const UNTITLED: &str = "No title";

/// Category assigned when no categorization rule matches.
pub const DEFAULT_CATEGORY: &str = "Agentic Tools";

/// Maximum snippet length in characters (not bytes).
pub const MAX_SNIPPET_CHARS: usize = 300;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to write cache file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize cache snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

// ============================================================================
// Data Structures
// ============================================================================

/// A single news item, normalized from any source.
///
/// `url` is the identity key. After deduplication no two articles in a
/// collection share a url. `published` is always UTC; sources convert at
/// ingestion time so downstream code never compares mixed offsets.
///
/// Field names on disk follow the cache file format (`published_date`,
/// `content_snippet`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    #[serde(rename = "published_date", with = "iso8601::option")]
    pub published: Option<DateTime<Utc>>,
    pub source: String,
    #[serde(rename = "content_snippet")]
    pub snippet: String,
    pub category: String,
}

impl Article {
    /// Build an article, enforcing the title/category/snippet invariants.
    ///
    /// - blank `title` becomes [`UNTITLED`]
    /// - blank `category` becomes [`DEFAULT_CATEGORY`]
    /// - `snippet` is cut to [`MAX_SNIPPET_CHARS`] characters
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        published: Option<DateTime<Utc>>,
        source: impl Into<String>,
        snippet: &str,
        category: impl Into<String>,
    ) -> Self {
        let title = title.into();
        let category = category.into();
        Self {
            title: if title.trim().is_empty() {
                UNTITLED.to_string()
            } else {
                title
            },
            url: url.into(),
            published,
            source: source.into(),
            snippet: crate::util::truncate_chars(snippet, MAX_SNIPPET_CHARS).into_owned(),
            category: if category.trim().is_empty() {
                DEFAULT_CATEGORY.to_string()
            } else {
                category
            },
        }
    }

    /// Whether the invariants enforced by [`Article::new`] hold. Deserialized
    /// articles bypass the constructor, so loaders check this.
    pub fn is_well_formed(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.category.trim().is_empty()
            && self.snippet.chars().count() <= MAX_SNIPPET_CHARS
    }
}

/// The single cached aggregation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    #[serde(rename = "timestamp", with = "iso8601")]
    pub captured_at: DateTime<Utc>,
    pub articles: Vec<Article>,
}

impl CacheSnapshot {
    pub fn new(captured_at: DateTime<Utc>, articles: Vec<Article>) -> Self {
        Self {
            captured_at,
            articles,
        }
    }
}

// ============================================================================
// ISO-8601 (de)serialization
// ============================================================================

/// ISO-8601 timestamps for the cache file.
///
/// Written as RFC 3339 in UTC with full sub-second precision so a round trip
/// is exact. On read, offset-less timestamps (written by older versions as
/// local wall-clock time) are interpreted in the local zone and converted to
/// UTC.
pub(crate) mod iso8601 {
    use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        let naive: NaiveDateTime = raw.parse().ok()?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn format(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            dt: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => s.serialize_some(&format(dt)),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(d)? {
                None => Ok(None),
                Some(raw) => parse(&raw)
                    .map(Some)
                    .ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}"))),
            }
        }
    }
}
