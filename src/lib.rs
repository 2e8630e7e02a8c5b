//! Terminal news desk for agentic coding tools.
//!
//! Pulls articles from a configured set of RSS feeds and a keyword search
//! over Hacker News, deduplicates them by URL, keeps the ones inside a
//! recency window, caches the result on disk and presents it through a
//! filterable view model and a ratatui front end.

pub mod app;
pub mod config;
pub mod export;
pub mod pipeline;
pub mod sources;
pub mod storage;
pub mod summarizer;
pub mod theme;
pub mod ui;
pub mod util;
pub mod view_model;
