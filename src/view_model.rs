//! UI-independent view state over the current article collection.
//!
//! The terminal front end owns one [`ViewModel`] and only changes it through
//! the named operations below (or [`ViewModel::dispatch`]). Every derived list
//! is recomputed on demand from the backing collection.

use std::collections::HashMap;

use crate::sources::categorize::{CLAUDE_CODE, CODEX, OPENCLAW};
use crate::sources::HACKER_NEWS;
use crate::storage::{Article, DEFAULT_CATEGORY};

/// Category sentinel that disables category filtering.
pub const ALL: &str = "All";

/// Sidebar categories, in display order.
pub const CATEGORIES: [&str; 6] = [ALL, CLAUDE_CODE, CODEX, DEFAULT_CATEGORY, OPENCLAW, HACKER_NEWS];

/// User intents the view model understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    CategorySelected(String),
    ArticleSelected(Article),
    SearchChanged(String),
}

#[derive(Debug, Clone)]
pub struct ViewModel {
    articles: Vec<Article>,
    active_category: String,
    search_text: String,
    selected: Option<Article>,
    /// Summaries keyed by article url.
    summaries: HashMap<String, String>,
}

impl Default for ViewModel {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ViewModel {
    pub fn new(articles: Vec<Article>) -> Self {
        Self {
            articles,
            active_category: ALL.to_string(),
            search_text: String::new(),
            selected: None,
            summaries: HashMap::new(),
        }
    }

    pub fn categories(&self) -> &'static [&'static str] {
        &CATEGORIES
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn active_category(&self) -> &str {
        &self.active_category
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn selected(&self) -> Option<&Article> {
        self.selected.as_ref()
    }

    pub fn summary(&self, url: &str) -> Option<&str> {
        self.summaries.get(url).map(String::as_str)
    }

    pub fn summaries(&self) -> &HashMap<String, String> {
        &self.summaries
    }

    pub fn set_category(&mut self, name: impl Into<String>) {
        self.active_category = name.into();
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Select `article` if the collection contains an article with its url.
    ///
    /// Returns whether the selection changed to it.
    pub fn select(&mut self, article: &Article) -> bool {
        match self.articles.iter().find(|a| a.url == article.url) {
            Some(found) => {
                self.selected = Some(found.clone());
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn record_summary(&mut self, url: impl Into<String>, text: impl Into<String>) {
        self.summaries.insert(url.into(), text.into());
    }

    pub fn dispatch(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::CategorySelected(name) => self.set_category(name),
            ViewEvent::ArticleSelected(article) => {
                if !self.select(&article) {
                    tracing::debug!(url = %article.url, "Ignoring selection of unknown article");
                }
            }
            ViewEvent::SearchChanged(text) => self.set_search_text(text),
        }
    }

    /// Articles passing the category filter and the search filter, in
    /// collection order.
    ///
    /// Search is a case-insensitive substring match on title or source.
    pub fn visible_articles(&self) -> Vec<&Article> {
        let needle = self.search_text.trim().to_lowercase();
        let all = self.active_category == ALL;

        self.articles
            .iter()
            .filter(|a| all || a.category == self.active_category)
            .filter(|a| {
                needle.is_empty()
                    || a.title.to_lowercase().contains(&needle)
                    || a.source.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Visible articles grouped by source, groups in first-seen order.
    pub fn grouped_by_source(&self) -> Vec<(&str, Vec<&Article>)> {
        let mut groups: Vec<(&str, Vec<&Article>)> = Vec::new();
        for article in self.visible_articles() {
            match groups.iter_mut().find(|(source, _)| *source == article.source) {
                Some((_, items)) => items.push(article),
                None => groups.push((article.source.as_str(), vec![article])),
            }
        }
        groups
    }

    /// Swap in a freshly aggregated collection.
    ///
    /// This is not a rebuild from scratch: category and search text carry
    /// over, the selection survives only if its url is still present, and
    /// summaries are kept for urls that are. Use [`ViewModel::new`] for a
    /// clean view state.
    pub fn replace_articles(&mut self, articles: Vec<Article>) {
        self.articles = articles;

        let selected_url = self.selected.take().map(|a| a.url);
        if let Some(url) = selected_url {
            self.selected = self.articles.iter().find(|a| a.url == url).cloned();
        }

        let live: std::collections::HashSet<&str> =
            self.articles.iter().map(|a| a.url.as_str()).collect();
        self.summaries.retain(|url, _| live.contains(url.as_str()));
    }
}
