use chrono::{DateTime, TimeDelta, Utc};
use std::path::{Path, PathBuf};

use super::types::{Article, CacheError, CacheSnapshot};
use crate::util::write_atomic;

/// Single-slot, file-backed cache of the last aggregation result.
///
/// The cache never raises on read: a missing, unreadable, oversized or
/// malformed file is a miss, exactly like an expired one.
#[derive(Debug, Clone)]
pub struct TtlCache {
    path: PathBuf,
    expiry: TimeDelta,
}

impl TtlCache {
    pub const FILE_NAME: &'static str = "articles_cache.json";

    /// Snapshots above this size are ignored rather than parsed.
    const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

    pub fn new(path: impl Into<PathBuf>, expiry: TimeDelta) -> Self {
        Self {
            path: path.into(),
            expiry,
        }
    }

    /// Cache living at `<dir>/articles_cache.json`.
    pub fn in_dir(dir: &Path, expiry: TimeDelta) -> Self {
        Self::new(dir.join(Self::FILE_NAME), expiry)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn expiry(&self) -> TimeDelta {
        self.expiry
    }

    /// Persist `snapshot` as the sole cached value, replacing any prior one.
    pub fn store(&self, snapshot: &CacheSnapshot) -> Result<(), CacheError> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_atomic(&self.path, &json)?;
        tracing::debug!(
            path = %self.path.display(),
            articles = snapshot.articles.len(),
            "Stored cache snapshot"
        );
        Ok(())
    }

    /// Cached articles if a fresh snapshot exists.
    pub fn load(&self) -> Option<Vec<Article>> {
        self.load_at(Utc::now())
    }

    /// Cached articles if a snapshot exists and `now - captured_at <= expiry`.
    pub fn load_at(&self, now: DateTime<Utc>) -> Option<Vec<Article>> {
        let snapshot = self.read_snapshot()?;
        let age = now.signed_duration_since(snapshot.captured_at);
        if age > self.expiry {
            tracing::debug!(
                age_secs = age.num_seconds(),
                expiry_secs = self.expiry.num_seconds(),
                "Cache snapshot expired"
            );
            return None;
        }
        Some(snapshot.articles)
    }

    /// Remove the stored snapshot. A missing file is not an error.
    pub fn clear(&self) -> Result<(), CacheError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Cleared cache");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Io(e)),
        }
    }

    fn read_snapshot(&self) -> Option<CacheSnapshot> {
        match std::fs::metadata(&self.path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                tracing::warn!(
                    path = %self.path.display(),
                    size = meta.len(),
                    "Cache file too large, ignoring"
                );
                return None;
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Cannot stat cache file");
                return None;
            }
        }

        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Cannot read cache file");
                return None;
            }
        };

        match serde_json::from_slice::<CacheSnapshot>(&bytes) {
            Ok(snapshot) => {
                if let Some(bad) = snapshot.articles.iter().find(|a| !a.is_well_formed()) {
                    tracing::warn!(
                        path = %self.path.display(),
                        url = %bad.url,
                        "Cache file holds a malformed article, treating as miss"
                    );
                    return None;
                }
                Some(snapshot)
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Corrupt cache file, treating as miss");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MAX_SNIPPET_CHARS;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn temp_cache(name: &str) -> (PathBuf, TtlCache) {
        let dir = std::env::temp_dir().join(format!("toadman_cache_test_{name}"));
        std::fs::remove_dir_all(&dir).ok();
        std::fs::create_dir_all(&dir).unwrap();
        let cache = TtlCache::in_dir(&dir, TimeDelta::hours(1));
        (dir, cache)
    }

    fn sample_articles() -> Vec<Article> {
        vec![
            Article::new(
                "Codex ships",
                "https://openai.com/codex",
                Some(Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap()),
                "OpenAI",
                "snippet one",
                "Codex",
            ),
            Article::new(
                "Undated",
                "https://example.com/undated",
                None,
                "Claude Log",
                "",
                "Claude Code",
            ),
        ]
    }

    #[test]
    fn test_round_trip_preserves_every_field() {
        let (dir, cache) = temp_cache("round_trip");
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let snapshot = CacheSnapshot::new(now, sample_articles());

        cache.store(&snapshot).unwrap();
        let loaded = cache.load_at(now).unwrap();

        assert_eq!(loaded, snapshot.articles);
        assert!(loaded[1].published.is_none());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_ttl_boundary() {
        let (dir, cache) = temp_cache("ttl_boundary");
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let expiry = cache.expiry();

        let fresh = now - expiry + TimeDelta::seconds(1);
        cache.store(&CacheSnapshot::new(fresh, sample_articles())).unwrap();
        assert!(cache.load_at(now).is_some());

        let exact = now - expiry;
        cache.store(&CacheSnapshot::new(exact, sample_articles())).unwrap();
        assert!(cache.load_at(now).is_some());

        let stale = now - expiry - TimeDelta::seconds(1);
        cache.store(&CacheSnapshot::new(stale, sample_articles())).unwrap();
        assert!(cache.load_at(now).is_none());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_store_overwrites_previous() {
        let (dir, cache) = temp_cache("overwrite");
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

        cache.store(&CacheSnapshot::new(now, sample_articles())).unwrap();
        cache.store(&CacheSnapshot::new(now, Vec::new())).unwrap();

        assert_eq!(cache.load_at(now), Some(Vec::new()));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_file_is_miss() {
        let (dir, cache) = temp_cache("missing");
        assert!(cache.load().is_none());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_corrupt_file_is_miss() {
        let (dir, cache) = temp_cache("corrupt");
        std::fs::write(cache.path(), "{ not json").unwrap();
        assert!(cache.load().is_none());

        std::fs::write(cache.path(), r#"{"timestamp": "soon", "articles": []}"#).unwrap();
        assert!(cache.load().is_none());

        std::fs::write(cache.path(), r#"{"articles": []}"#).unwrap();
        assert!(cache.load().is_none());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_malformed_article_is_miss() {
        let (dir, cache) = temp_cache("malformed_article");
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

        let empty_category = r#"{"timestamp": "2025-06-01T12:00:00Z", "articles": [
            {"title": "T", "url": "https://a", "published_date": null,
             "source": "Feed", "content_snippet": "", "category": ""}]}"#;
        std::fs::write(cache.path(), empty_category).unwrap();
        assert!(cache.load_at(now).is_none());

        let long_snippet = format!(
            r#"{{"timestamp": "2025-06-01T12:00:00Z", "articles": [
            {{"title": "T", "url": "https://a", "published_date": null,
             "source": "Feed", "content_snippet": "{}", "category": "Codex"}}]}}"#,
            "x".repeat(MAX_SNIPPET_CHARS + 1)
        );
        std::fs::write(cache.path(), long_snippet).unwrap();
        assert!(cache.load_at(now).is_none());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_clear_removes_snapshot_and_tolerates_absence() {
        let (dir, cache) = temp_cache("clear");
        let now = Utc::now();
        cache.store(&CacheSnapshot::new(now, sample_articles())).unwrap();

        cache.clear().unwrap();
        assert!(cache.load().is_none());
        assert!(!cache.path().exists());

        // Second clear on an absent file is fine
        cache.clear().unwrap();

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_reads_naive_timestamps() {
        let (dir, cache) = temp_cache("naive");
        let content = r#"{
  "timestamp": "2025-06-01T11:30:00.123456",
  "articles": [
    {
      "title": "Legacy entry",
      "url": "https://example.com/legacy",
      "published_date": "2025-06-01T08:00:00",
      "source": "Anthropic",
      "content_snippet": "",
      "category": "Claude Code"
    }
  ]
}"#;
        std::fs::write(cache.path(), content).unwrap();

        let captured = crate::storage::types::iso8601::parse("2025-06-01T11:30:00.123456").unwrap();
        let loaded = cache.load_at(captured).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].published.is_some());

        std::fs::remove_dir_all(&dir).ok();
    }
}
