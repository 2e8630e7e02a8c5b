//! Aggregation: cache lookup, concurrent fetch, dedupe, sort and window.
//!
//! [`AggregationPipeline::get_articles`] is the only entry point with side
//! effects. The transforms in [`dedup`] and [`window`] are pure.

mod dedup;
mod window;

pub use dedup::dedupe;
pub use window::{apply_window, sort_and_window, sort_by_recency};

use chrono::{DateTime, Local, TimeZone, Utc};
use std::time::Duration;
use tokio::sync::Mutex;

use crate::config::{Config, FeedSource, HackerNewsConfig};
use crate::sources::{fetch_rss_articles, search_hacker_news, HttpFetcher};
use crate::storage::{Article, CacheSnapshot, TtlCache};

/// Per-request timeout for feed downloads.
pub const FEED_TIMEOUT: Duration = Duration::from_secs(30);
/// Per-request timeout for search queries.
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

pub struct AggregationPipeline {
    feeds: Vec<FeedSource>,
    hacker_news: HackerNewsConfig,
    window_days: u32,
    feed_fetcher: HttpFetcher,
    search_fetcher: HttpFetcher,
    cache: TtlCache,
    /// Held for a whole `get_articles` run so refreshes never interleave on the cache file.
    run_lock: Mutex<()>,
}

impl AggregationPipeline {
    pub fn new(config: &Config, client: reqwest::Client, cache: TtlCache) -> Self {
        Self {
            feeds: config.rss_feeds.clone(),
            hacker_news: config.hacker_news.clone(),
            window_days: config.window_days,
            feed_fetcher: HttpFetcher::new(client.clone(), FEED_TIMEOUT),
            search_fetcher: HttpFetcher::new(client, SEARCH_TIMEOUT),
            cache,
            run_lock: Mutex::new(()),
        }
    }

    /// Override the retry delay of both fetchers.
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.feed_fetcher = self.feed_fetcher.with_backoff_base(base);
        self.search_fetcher = self.search_fetcher.with_backoff_base(base);
        self
    }

    pub fn cache(&self) -> &TtlCache {
        &self.cache
    }

    /// Articles for display, from cache when fresh, otherwise fetched.
    ///
    /// `force_refresh` clears the cache and always fetches. Never fails: source
    /// errors yield fewer articles and a failed cache write is only logged.
    pub async fn get_articles(&self, force_refresh: bool) -> Vec<Article> {
        self.get_articles_at(force_refresh, &Local::now()).await
    }

    /// [`get_articles`](Self::get_articles) with an explicit clock. Window
    /// dates are computed in the timezone of `now`.
    pub async fn get_articles_at<Tz>(&self, force_refresh: bool, now: &DateTime<Tz>) -> Vec<Article>
    where
        Tz: TimeZone + Sync,
        Tz::Offset: Sync,
    {
        let _guard = self.run_lock.lock().await;
        let now_utc = now.with_timezone(&Utc);

        if force_refresh {
            if let Err(e) = self.cache.clear() {
                tracing::warn!(error = %e, "Failed to clear cache before refresh");
            }
        } else if let Some(cached) = self.cache.load_at(now_utc) {
            let windowed = apply_window(cached, self.window_days, now);
            tracing::info!(articles = windowed.len(), "Serving articles from cache");
            return windowed;
        }

        let fetched = self.fetch_all().await;
        let fetched_count = fetched.len();
        let unique = dedupe(fetched);
        let articles = sort_and_window(unique, self.window_days, now);

        tracing::info!(
            fetched = fetched_count,
            kept = articles.len(),
            window_days = self.window_days,
            "Aggregated articles"
        );

        if let Err(e) = self
            .cache
            .store(&CacheSnapshot::new(now_utc, articles.clone()))
        {
            tracing::warn!(path = %self.cache.path().display(), error = %e, "Failed to write cache");
        }

        articles
    }

    /// Raw output of all sources: RSS articles first, then search results.
    pub async fn fetch_all(&self) -> Vec<Article> {
        let (mut rss, search) = tokio::join!(
            fetch_rss_articles(&self.feed_fetcher, &self.feeds),
            search_hacker_news(&self.search_fetcher, &self.hacker_news),
        );
        tracing::debug!(rss = rss.len(), search = search.len(), "Fetched all sources");
        rss.extend(search);
        rss
    }
}
