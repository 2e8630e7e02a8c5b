use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use super::http::{FetchError, HttpFetcher};
use crate::config::HackerNewsConfig;
use crate::pipeline::dedupe;
use crate::storage::{iso8601, Article};

/// Source and category label for every search result.
pub const HACKER_NEWS: &str = "Hacker News";

const ITEM_PERMALINK: &str = "https://news.ycombinator.com/item?id=";

/// Keywords queried at once.
const MAX_CONCURRENT_QUERIES: usize = 4;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Invalid search endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("Malformed search response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "objectID", default)]
    object_id: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    created_at_i: Option<i64>,
    #[serde(default)]
    story_text: Option<String>,
}

impl SearchHit {
    fn into_article(self) -> Article {
        let url = match self.url.as_deref().map(str::trim) {
            Some(u) if !u.is_empty() => u.to_string(),
            _ => match self.object_id.as_deref() {
                Some(id) if !id.is_empty() => format!("{ITEM_PERMALINK}{id}"),
                _ => String::new(),
            },
        };

        let published: Option<DateTime<Utc>> = self
            .created_at
            .as_deref()
            .and_then(iso8601::parse)
            .or_else(|| self.created_at_i.and_then(|ts| DateTime::from_timestamp(ts, 0)));

        Article::new(
            self.title.unwrap_or_default(),
            url,
            published,
            HACKER_NEWS,
            self.story_text.as_deref().unwrap_or(""),
            HACKER_NEWS,
        )
    }
}

/// Run one story search per configured keyword and merge the results.
///
/// A story matching several keywords appears once, at its first position.
/// A failing keyword is logged and skipped.
pub async fn search_hacker_news(fetcher: &HttpFetcher, config: &HackerNewsConfig) -> Vec<Article> {
    if config.keywords.is_empty() {
        return Vec::new();
    }

    let per_keyword: Vec<Vec<Article>> = stream::iter(config.keywords.clone())
        .map(|keyword| {
            let fetcher = fetcher.clone();
            let config = config.clone();
            async move {
                match search_keyword(&fetcher, &config, &keyword).await {
                    Ok(articles) => {
                        tracing::debug!(keyword = %keyword, hits = articles.len(), "Search complete");
                        articles
                    }
                    Err(e) => {
                        tracing::warn!(keyword = %keyword, error = %e, "Hacker News search failed");
                        Vec::new()
                    }
                }
            }
        })
        .buffered(MAX_CONCURRENT_QUERIES)
        .collect()
        .await;

    dedupe(per_keyword.into_iter().flatten())
}

/// Stories matching `keyword`, capped at `hits_per_keyword`.
pub async fn search_keyword(
    fetcher: &HttpFetcher,
    config: &HackerNewsConfig,
    keyword: &str,
) -> Result<Vec<Article>, SearchError> {
    let hits = config.hits_per_keyword.to_string();
    let url = Url::parse_with_params(
        &config.base_url,
        [
            ("query", keyword),
            ("tags", "story"),
            ("hitsPerPage", hits.as_str()),
        ],
    )?;

    let bytes = fetcher.get_bytes(&url).await?;
    let response: SearchResponse = serde_json::from_slice(&bytes)?;

    Ok(response
        .hits
        .into_iter()
        .take(config.hits_per_keyword as usize)
        .map(SearchHit::into_article)
        .collect())
}
