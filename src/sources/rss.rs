use futures::stream::{self, StreamExt};
use url::Url;

use super::categorize::categorize;
use super::http::{FetchError, HttpFetcher};
use super::parser::{parse_feed, FeedEntry};
use crate::config::FeedSource;
use crate::storage::Article;

/// Entries kept per feed, newest first.
pub const MAX_ENTRIES_PER_FEED: usize = 10;

/// Feeds fetched at once.
const MAX_CONCURRENT_FEEDS: usize = 10;

/// Fetch every feed and return their articles in feed declaration order.
///
/// Each feed is isolated: a network, HTTP or parse failure is logged and
/// contributes no articles, while the remaining feeds are still collected.
pub async fn fetch_rss_articles(fetcher: &HttpFetcher, feeds: &[FeedSource]) -> Vec<Article> {
    if feeds.is_empty() {
        return Vec::new();
    }

    // `buffered` keeps input order while running up to N fetches at once.
    // Items are owned so the future stays `Send` when spawned.
    let per_feed: Vec<Vec<Article>> = stream::iter(feeds.to_vec())
        .map(|feed| {
            let fetcher = fetcher.clone();
            async move {
                match fetch_feed(&fetcher, &feed).await {
                    Ok(articles) => {
                        tracing::debug!(feed = %feed.name, articles = articles.len(), "Fetched feed");
                        articles
                    }
                    Err(e) => {
                        tracing::warn!(feed = %feed.name, url = %feed.url, error = %e, "Feed fetch failed");
                        Vec::new()
                    }
                }
            }
        })
        .buffered(MAX_CONCURRENT_FEEDS)
        .collect()
        .await;

    per_feed.into_iter().flatten().collect()
}

/// Fetch one feed and convert its newest entries to articles.
pub async fn fetch_feed(
    fetcher: &HttpFetcher,
    feed: &FeedSource,
) -> Result<Vec<Article>, FetchError> {
    let url = Url::parse(feed.url.trim())?;
    let bytes = fetcher.get_bytes(&url).await?;
    let entries = parse_feed(&bytes).map_err(|e| FetchError::Parse(e.to_string()))?;
    Ok(entries_to_articles(entries, &feed.name))
}

/// Keep the newest [`MAX_ENTRIES_PER_FEED`] entries and tag each with a category.
///
/// Entries are ordered by timestamp, newest first; undated entries follow the
/// dated ones in document order.
pub fn entries_to_articles(mut entries: Vec<FeedEntry>, source: &str) -> Vec<Article> {
    // Stable sort: equal keys keep document order
    entries.sort_by(|a, b| b.published.cmp(&a.published));
    entries.truncate(MAX_ENTRIES_PER_FEED);

    entries
        .into_iter()
        .map(|entry| {
            let title = entry.title.unwrap_or_default();
            let category = categorize(&title, source);
            Article::new(
                title,
                entry.link,
                entry.published,
                source,
                entry.summary.as_deref().unwrap_or(""),
                category,
            )
        })
        .collect()
}
