use crate::config::SummarizerConfig;
use crate::pipeline::AggregationPipeline;
use crate::storage::Article;
use crate::theme::ColorPalette;
use crate::view_model::{ViewEvent, ViewModel};
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::Instant;

/// Seconds a status message stays visible.
const STATUS_TTL_SECS: u64 = 3;

// ============================================================================
// Focus and Event Types
// ============================================================================

/// Which panel has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Categories,
    Articles,
}

/// One row of the article panel: a source heading or an article under it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListRow<'a> {
    Source { name: &'a str, count: usize },
    Article(&'a Article),
}

/// Events from background tasks
#[derive(Debug)]
pub enum AppEvent {
    /// A pipeline run finished with this collection.
    RefreshComplete(Vec<Article>),
    /// Summary text (or an inline error string) for the article at `url`.
    SummaryReady { url: String, text: String },
    ExportComplete { path: PathBuf, count: usize },
    ExportFailed { error: String },
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Name of the task that panicked (e.g., "refresh", "summarize")
    /// - `error`: The panic message extracted from the panic payload
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Application State
// ============================================================================

pub struct App {
    pub view: ViewModel,
    pub pipeline: Arc<AggregationPipeline>,
    pub summarizer: SummarizerConfig,
    pub export_dir: PathBuf,
    pub palette: ColorPalette,

    pub focus: Focus,
    /// Cursor in the category sidebar.
    pub category_index: usize,
    /// Cursor over the articles in display order (headings excluded).
    pub article_index: usize,
    /// Scroll offset of the detail pane.
    pub detail_scroll: u16,

    pub search_mode: bool,
    pub show_help: bool,

    /// A pipeline run is in flight; further refresh requests are rejected.
    pub refreshing: bool,
    /// Urls with a summarization in flight.
    pub summarizing: HashSet<String>,

    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub needs_redraw: bool,
}

impl App {
    pub fn new(
        view: ViewModel,
        pipeline: Arc<AggregationPipeline>,
        summarizer: SummarizerConfig,
        export_dir: PathBuf,
    ) -> Self {
        let mut app = Self {
            view,
            pipeline,
            summarizer,
            export_dir,
            palette: ColorPalette::default(),
            focus: Focus::Articles,
            category_index: 0,
            article_index: 0,
            detail_scroll: 0,
            search_mode: false,
            show_help: false,
            refreshing: false,
            summarizing: HashSet::new(),
            status_message: None,
            needs_redraw: true,
        };
        app.sync_selection();
        app
    }

    // ------------------------------------------------------------------------
    // Derived lists
    // ------------------------------------------------------------------------

    /// Visible articles in panel order: grouped by source, groups in
    /// first-seen order.
    pub fn display_articles(&self) -> Vec<&Article> {
        self.view
            .grouped_by_source()
            .into_iter()
            .flat_map(|(_, articles)| articles)
            .collect()
    }

    /// Article panel rows including a heading per source.
    pub fn display_rows(&self) -> Vec<ListRow<'_>> {
        let mut rows = Vec::new();
        for (name, articles) in self.view.grouped_by_source() {
            rows.push(ListRow::Source {
                name,
                count: articles.len(),
            });
            rows.extend(articles.into_iter().map(ListRow::Article));
        }
        rows
    }

    /// Article under the cursor.
    pub fn cursor_article(&self) -> Option<&Article> {
        self.display_articles().get(self.article_index).copied()
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    pub fn move_down(&mut self) {
        match self.focus {
            Focus::Categories => {
                let last = self.view.categories().len().saturating_sub(1);
                if self.category_index < last {
                    self.category_index += 1;
                    self.apply_category();
                }
            }
            Focus::Articles => {
                let len = self.display_articles().len();
                if self.article_index + 1 < len {
                    self.article_index += 1;
                    self.sync_selection();
                }
            }
        }
    }

    pub fn move_up(&mut self) {
        match self.focus {
            Focus::Categories => {
                if self.category_index > 0 {
                    self.category_index -= 1;
                    self.apply_category();
                }
            }
            Focus::Articles => {
                if self.article_index > 0 {
                    self.article_index -= 1;
                    self.sync_selection();
                }
            }
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Categories => Focus::Articles,
            Focus::Articles => Focus::Categories,
        };
    }

    /// Enter: confirm the category and jump to its articles, or select the
    /// article under the cursor.
    pub fn activate(&mut self) {
        match self.focus {
            Focus::Categories => {
                self.apply_category();
                self.focus = Focus::Articles;
            }
            Focus::Articles => self.sync_selection(),
        }
    }

    fn apply_category(&mut self) {
        if let Some(name) = self.view.categories().get(self.category_index) {
            self.view
                .dispatch(ViewEvent::CategorySelected((*name).to_string()));
        }
        self.article_index = 0;
        self.sync_selection();
    }

    /// Point the view model's selection at the article under the cursor.
    fn sync_selection(&mut self) {
        self.clamp_cursor();
        match self.cursor_article().cloned() {
            Some(article) => {
                if self.view.selected().map(|s| s.url.as_str()) != Some(article.url.as_str()) {
                    self.detail_scroll = 0;
                }
                self.view.dispatch(ViewEvent::ArticleSelected(article));
            }
            None => self.view.clear_selection(),
        }
    }

    fn clamp_cursor(&mut self) {
        let len = self.display_articles().len();
        if self.article_index >= len {
            self.article_index = len.saturating_sub(1);
        }
    }

    pub fn scroll_detail_down(&mut self, amount: u16) {
        self.detail_scroll = self.detail_scroll.saturating_add(amount);
    }

    pub fn scroll_detail_up(&mut self, amount: u16) {
        self.detail_scroll = self.detail_scroll.saturating_sub(amount);
    }

    // ------------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------------

    pub fn start_search(&mut self) {
        self.search_mode = true;
    }

    /// Apply `text` as the live search filter.
    pub fn update_search(&mut self, text: String) {
        self.view.dispatch(ViewEvent::SearchChanged(text));
        self.article_index = 0;
        self.sync_selection();
    }

    /// Leave search mode, keeping the filter.
    pub fn confirm_search(&mut self) {
        self.search_mode = false;
    }

    /// Leave search mode and drop the filter.
    pub fn clear_search(&mut self) {
        self.search_mode = false;
        if !self.view.search_text().is_empty() {
            self.update_search(String::new());
        }
    }

    // ------------------------------------------------------------------------
    // Background results
    // ------------------------------------------------------------------------

    /// Swap in a refreshed collection, keeping the cursor on the same article
    /// when it is still visible.
    pub fn apply_refresh(&mut self, articles: Vec<Article>) {
        let previous = self.view.selected().map(|a| a.url.clone());
        self.view.replace_articles(articles);

        self.article_index = previous
            .and_then(|url| self.display_articles().iter().position(|a| a.url == url))
            .unwrap_or(0);
        self.sync_selection();
    }

    pub fn apply_summary(&mut self, url: String, text: String) {
        self.summarizing.remove(&url);
        self.view.record_summary(url, text);
    }

    // ------------------------------------------------------------------------
    // Status bar
    // ------------------------------------------------------------------------

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= STATUS_TTL_SECS {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}
