//! Article sources: RSS/Atom feeds and Hacker News keyword search.
//!
//! - [`http`] - GET with timeout, retry and size limits shared by both sources
//! - [`parser`] - feed XML to entries using the `feed-rs` crate
//! - [`categorize`] - ordered rule table mapping title/source to a category
//! - [`rss`] - per-feed fetch with failure isolation
//! - [`hn`] - per-keyword story search with failure isolation

pub mod categorize;
mod hn;
mod http;
mod parser;
mod rss;

pub use hn::{search_hacker_news, search_keyword, SearchError, HACKER_NEWS};
pub use http::{build_client, FetchError, HttpFetcher};
pub use parser::{parse_feed, FeedEntry};
pub use rss::{entries_to_articles, fetch_feed, fetch_rss_articles, MAX_ENTRIES_PER_FEED};
