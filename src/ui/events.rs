//! Application event handling.
//!
//! Applies background task results (refresh, summarize, export) to the
//! application state.

use crate::app::{App, AppEvent};

/// Handle an event from a background task.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::RefreshComplete(articles) => {
            app.refreshing = false;
            let count = articles.len();
            app.apply_refresh(articles);
            tracing::info!(articles = count, "Refresh complete");
            app.set_status(format!("Refreshed: {} articles", count));
        }
        AppEvent::SummaryReady { url, text } => {
            let failed = text.starts_with("Error:");
            app.apply_summary(url, text);
            if failed {
                app.set_status("Summary failed, see detail pane");
            } else {
                app.set_status("Summary ready");
            }
        }
        AppEvent::ExportComplete { path, count } => {
            app.set_status(format!("Exported {} articles to {}", count, path.display()));
        }
        AppEvent::ExportFailed { error } => {
            tracing::warn!(error = %error, "Export failed");
            app.set_status(format!("Export failed: {}", error));
        }
        AppEvent::TaskPanicked { task, error } => {
            if task == "refresh" {
                app.refreshing = false;
            }
            app.set_status(format!("Internal error in {}: {}", task, error));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{article, sample, test_app};
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_refresh_complete_replaces_articles() {
        let mut app = test_app(sample());
        app.refreshing = true;

        handle_app_event(
            &mut app,
            AppEvent::RefreshComplete(vec![article("New", "https://new", "Blog", "Codex")]),
        );

        assert!(!app.refreshing);
        assert_eq!(app.view.articles().len(), 1);
        assert_eq!(app.view.selected().map(|a| a.url.as_str()), Some("https://new"));
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Refreshed: 1 articles");
    }

    #[tokio::test]
    async fn test_summary_ready_records_text() {
        let mut app = test_app(sample());
        app.summarizing.insert("https://2".to_string());

        handle_app_event(
            &mut app,
            AppEvent::SummaryReady {
                url: "https://2".to_string(),
                text: "Error: kiro-cli timed out after 60s".to_string(),
            },
        );

        assert!(app.summarizing.is_empty());
        assert_eq!(app.view.summary("https://2"), Some("Error: kiro-cli timed out after 60s"));
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.contains("failed"));
    }

    #[tokio::test]
    async fn test_export_events_set_status() {
        let mut app = test_app(sample());
        handle_app_event(
            &mut app,
            AppEvent::ExportComplete {
                path: PathBuf::from("/tmp/out.md"),
                count: 4,
            },
        );
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Exported 4 articles to /tmp/out.md");

        handle_app_event(
            &mut app,
            AppEvent::ExportFailed {
                error: "disk full".to_string(),
            },
        );
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Export failed: disk full");
    }

    #[tokio::test]
    async fn test_refresh_panic_unblocks_refresh() {
        let mut app = test_app(sample());
        app.refreshing = true;
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "refresh",
                error: "boom".to_string(),
            },
        );
        assert!(!app.refreshing);
    }
}
