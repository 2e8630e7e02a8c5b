//! Configuration file parser for ~/.toadman/config.toml.
//!
//! The config file is optional. A missing or empty file yields
//! `Config::default()`, and any section or key may be omitted. Unknown keys
//! are accepted but logged as possible typos.
use chrono::TimeDelta;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// A named RSS feed. The name doubles as the article `source`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
}

impl FeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Recency window in calendar days. 0 = today only.
    pub window_days: u32,

    /// Feed name to URL, in declaration order.
    #[serde(with = "feed_table")]
    pub rss_feeds: Vec<FeedSource>,

    pub hacker_news: HackerNewsConfig,
    pub cache: CacheConfig,
    pub summarizer: SummarizerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HackerNewsConfig {
    pub keywords: Vec<String>,
    pub hits_per_keyword: u32,
    pub base_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub expiry_hours: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub command: String,
    pub args: Vec<String>,
    pub timeout_secs: u64,
}

pub const DEFAULT_WINDOW_DAYS: u32 = 7;
pub const DEFAULT_HN_SEARCH_URL: &str = "https://hn.algolia.com/api/v1/search";

impl Default for Config {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            rss_feeds: vec![
                FeedSource::new("Anthropic", "https://www.anthropic.com/news/rss.xml"),
                FeedSource::new("OpenAI", "https://openai.com/blog/rss.xml"),
                FeedSource::new("Claude Log", "https://claudelog.com/feed.xml"),
                FeedSource::new("OpenClaw", "https://openclaw-ai.dev/feed.xml"),
            ],
            hacker_news: HackerNewsConfig::default(),
            cache: CacheConfig::default(),
            summarizer: SummarizerConfig::default(),
        }
    }
}

impl Default for HackerNewsConfig {
    fn default() -> Self {
        Self {
            keywords: ["agentic", "Claude Code", "Codex", "OpenClaw"]
                .into_iter()
                .map(String::from)
                .collect(),
            hits_per_keyword: 5,
            base_url: DEFAULT_HN_SEARCH_URL.to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { expiry_hours: 1 }
    }
}

impl CacheConfig {
    /// Longest accepted expiry; larger values are clamped (about 100 years).
    const MAX_EXPIRY_HOURS: u64 = 24 * 365 * 100;

    pub fn expiry(&self) -> TimeDelta {
        // Clamped above, so the cast cannot overflow
        TimeDelta::hours(self.expiry_hours.min(Self::MAX_EXPIRY_HOURS) as i64)
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            command: "kiro-cli".to_string(),
            args: vec!["chat".to_string()],
            timeout_secs: 60,
        }
    }
}

impl SummarizerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: &'static [(&'static str, &'static [&'static str])] = &[
        ("window_days", &[]),
        ("rss_feeds", &[]),
        ("hacker_news", &["keywords", "hits_per_keyword", "base_url"]),
        ("cache", &["expiry_hours"]),
        ("summarizer", &["command", "args", "timeout_secs"]),
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // Check size before reading so a huge file cannot exhaust memory
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            Self::warn_unknown_keys(&raw);
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            feeds = config.rss_feeds.len(),
            keywords = config.hacker_news.keywords.len(),
            window_days = config.window_days,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Write this configuration to `path` atomically, creating parent dirs.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        crate::util::write_atomic(path, content.as_bytes())?;
        tracing::debug!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Load `path`, writing the defaults there first if no file exists.
    ///
    /// Never fails: an unreadable, oversized or malformed file is logged and
    /// the defaults are used. The file itself is left untouched.
    pub fn load_or_init(path: &Path) -> Self {
        if !path.exists() {
            let config = Self::default();
            match config.save(path) {
                Ok(()) => tracing::info!(path = %path.display(), "Wrote default configuration"),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Could not write default config")
                }
            }
            return config;
        }
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Invalid config, using defaults");
            Self::default()
        })
    }

    fn warn_unknown_keys(raw: &toml::Table) {
        for (key, value) in raw {
            let Some((_, nested)) = Self::KNOWN_KEYS.iter().find(|(k, _)| k == key) else {
                tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                continue;
            };
            if nested.is_empty() {
                continue;
            }
            if let toml::Value::Table(section) = value {
                for sub in section.keys() {
                    if !nested.contains(&sub.as_str()) {
                        tracing::warn!(section = %key, key = %sub, "Unknown key in config file, ignoring");
                    }
                }
            }
        }
    }
}

/// `[rss_feeds]` is a `name = "url"` table whose key order is meaningful:
/// it decides fetch and display order. Deserialize it straight into a Vec so
/// document order survives.
mod feed_table {
    use super::*;
    use std::fmt;

    pub fn serialize<S: Serializer>(feeds: &[FeedSource], s: S) -> Result<S::Ok, S::Error> {
        let mut map = s.serialize_map(Some(feeds.len()))?;
        for feed in feeds {
            map.serialize_entry(&feed.name, &feed.url)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<FeedSource>, D::Error> {
        struct FeedTableVisitor;

        impl<'de> Visitor<'de> for FeedTableVisitor {
            type Value = Vec<FeedSource>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of feed name = url")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut feeds: Vec<FeedSource> = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, url)) = access.next_entry::<String, String>()? {
                    // Later duplicate names replace the earlier URL in place
                    match feeds.iter_mut().find(|f| f.name == name) {
                        Some(existing) => existing.url = url,
                        None => feeds.push(FeedSource { name, url }),
                    }
                }
                Ok(feeds)
            }
        }

        d.deserialize_map(FeedTableVisitor)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_config(name: &str, content: &str) -> (std::path::PathBuf, std::path::PathBuf) {
        let dir = std::env::temp_dir().join(format!("toadman_config_test_{name}"));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.window_days, 7);
        assert_eq!(config.rss_feeds.len(), 4);
        assert_eq!(config.rss_feeds[0].name, "Anthropic");
        assert_eq!(config.rss_feeds[2].url, "https://claudelog.com/feed.xml");
        assert_eq!(
            config.hacker_news.keywords,
            vec!["agentic", "Claude Code", "Codex", "OpenClaw"]
        );
        assert_eq!(config.hacker_news.hits_per_keyword, 5);
        assert_eq!(config.cache.expiry(), TimeDelta::hours(1));
        assert_eq!(config.summarizer.command, "kiro-cli");
        assert_eq!(config.summarizer.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/toadman_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_empty_and_whitespace_file_returns_default() {
        let (dir, path) = write_config("empty", "   \n  \n  ");
        let config = Config::load(&path).unwrap();
        assert_eq!(config, Config::default());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let (dir, path) = write_config("partial", "window_days = 0\n\n[cache]\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.window_days, 0);
        assert_eq!(config.cache.expiry_hours, 1);
        assert_eq!(config.rss_feeds, Config::default().rss_feeds);
        assert_eq!(config.hacker_news, HackerNewsConfig::default());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_feed_order_follows_document() {
        let content = r#"
[rss_feeds]
Zeta = "https://z.example/feed"
Alpha = "https://a.example/feed"
"Middle Feed" = "https://m.example/feed"
"#;
        let (dir, path) = write_config("feed_order", content);
        let config = Config::load(&path).unwrap();
        let names: Vec<&str> = config.rss_feeds.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Middle Feed"]);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let content = r#"
window_days = 3

[rss_feeds]
Blog = "https://blog.example/rss"

[hacker_news]
keywords = ["rust"]
hits_per_keyword = 20
base_url = "http://127.0.0.1:9000/search"

[cache]
expiry_hours = 6

[summarizer]
command = "llm"
args = ["-m", "small"]
timeout_secs = 5
"#;
        let (dir, path) = write_config("full", content);
        let config = Config::load(&path).unwrap();
        assert_eq!(config.window_days, 3);
        assert_eq!(
            config.rss_feeds,
            vec![FeedSource::new("Blog", "https://blog.example/rss")]
        );
        assert_eq!(config.hacker_news.keywords, vec!["rust"]);
        assert_eq!(config.hacker_news.hits_per_keyword, 20);
        assert_eq!(config.hacker_news.base_url, "http://127.0.0.1:9000/search");
        assert_eq!(config.cache.expiry(), TimeDelta::hours(6));
        assert_eq!(config.summarizer.args, vec!["-m", "small"]);
        assert_eq!(config.summarizer.timeout(), Duration::from_secs(5));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_empty_feed_table_means_no_feeds() {
        let (dir, path) = write_config("no_feeds", "[rss_feeds]\n");
        let config = Config::load(&path).unwrap();
        assert!(config.rss_feeds.is_empty());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let (dir, path) = write_config("invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let content = r#"
window_days = 2
totally_fake_key = "should not fail"

[cache]
expiry_hours = 3
expirey = 4
"#;
        let (dir, path) = write_config("unknown", content);
        let config = Config::load(&path).unwrap();
        assert_eq!(config.window_days, 2);
        assert_eq!(config.cache.expiry_hours, 3);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let (dir, path) = write_config("wrongtype", "window_days = \"seven\"\n");
        assert!(Config::load(&path).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let (dir, path) = write_config("too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = std::env::temp_dir().join("toadman_config_test_save");
        std::fs::remove_dir_all(&dir).ok();
        let path = dir.join("nested").join("config.toml");

        let mut config = Config::default();
        config.window_days = 1;
        config.rss_feeds.reverse();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_or_init_writes_defaults() {
        let dir = std::env::temp_dir().join("toadman_config_test_init");
        std::fs::remove_dir_all(&dir).ok();
        let path = dir.join("config.toml");

        let config = Config::load_or_init(&path);
        assert_eq!(config, Config::default());
        assert!(path.exists());
        assert_eq!(Config::load(&path).unwrap(), Config::default());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_or_init_falls_back_on_bad_file() {
        let (dir, path) = write_config("init_bad_type", "window_days = \"seven\"\n");
        assert_eq!(Config::load_or_init(&path), Config::default());
        // The user's file is not overwritten
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "window_days = \"seven\"\n"
        );
        std::fs::remove_dir_all(&dir).ok();

        let (dir, path) = write_config("init_bad_toml", "[hacker_news\nkeywords = 3");
        assert_eq!(Config::load_or_init(&path), Config::default());
        std::fs::remove_dir_all(&dir).ok();

        let (dir, path) = write_config("init_too_large", &"a".repeat(1_048_577));
        assert_eq!(Config::load_or_init(&path), Config::default());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_huge_expiry_is_clamped() {
        let cache = CacheConfig {
            expiry_hours: u64::MAX,
        };
        assert!(cache.expiry() > TimeDelta::days(365));
    }
}
