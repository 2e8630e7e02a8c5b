//! Background task spawning for the UI layer.
//!
//! Each spawner runs its work on the Tokio runtime and reports back through
//! the `AppEvent` channel. Panics are caught and surfaced as
//! `AppEvent::TaskPanicked` rather than silently killing the task.

use crate::app::{App, AppEvent};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// # Returns
///
/// - `Ok(result)` if the future completes normally
/// - `Err(panic_message)` if the future panics
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Send `event`, logging if the UI has already gone away.
async fn send_event(tx: &mpsc::Sender<AppEvent>, event: AppEvent, name: &'static str) {
    if let Err(e) = tx.send(event).await {
        tracing::warn!(error = %e, event = name, "Channel send failed (receiver dropped)");
    }
}

async fn report_panic(tx: &mpsc::Sender<AppEvent>, task: &'static str, error: String) {
    tracing::error!(task, error = %error, "Background task panicked");
    send_event(tx, AppEvent::TaskPanicked { task, error }, "TaskPanicked").await;
}

/// Start a forced pipeline run unless one is already in flight.
///
/// Returns whether a run was started.
pub(super) fn spawn_refresh(app: &mut App, tx: &mpsc::Sender<AppEvent>) -> bool {
    if app.refreshing {
        return false;
    }
    app.refreshing = true;

    let pipeline = Arc::clone(&app.pipeline);
    let tx = tx.clone();
    tokio::spawn(async move {
        match catch_task_panic(pipeline.get_articles(true)).await {
            Ok(articles) => {
                send_event(&tx, AppEvent::RefreshComplete(articles), "RefreshComplete").await
            }
            Err(error) => report_panic(&tx, "refresh", error).await,
        }
    });
    true
}

/// Summarize the selected article unless it already has a summary or one
/// is in flight.
///
/// Returns whether a summarization was started.
pub(super) fn spawn_summary(app: &mut App, tx: &mpsc::Sender<AppEvent>) -> bool {
    let Some(article) = app.view.selected().cloned() else {
        return false;
    };
    if app.summarizing.contains(&article.url) || app.view.summary(&article.url).is_some() {
        return false;
    }
    app.summarizing.insert(article.url.clone());

    let config = app.summarizer.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let url = article.url.clone();
        match catch_task_panic(crate::summarizer::summarize(&article, &config)).await {
            Ok(text) => send_event(&tx, AppEvent::SummaryReady { url, text }, "SummaryReady").await,
            Err(error) => {
                // Unblock the article so it can be retried
                let text = format!("Error: summarizer task failed: {error}");
                send_event(&tx, AppEvent::SummaryReady { url, text }, "SummaryReady").await;
                report_panic(&tx, "summarize", error).await;
            }
        }
    });
    true
}

/// Export the visible articles and known summaries to markdown.
pub(super) fn spawn_export(app: &App, tx: &mpsc::Sender<AppEvent>) {
    let articles: Vec<_> = app.display_articles().into_iter().cloned().collect();
    let summaries = app.view.summaries().clone();
    let dir = app.export_dir.clone();
    let tx = tx.clone();

    tokio::spawn(async move {
        let count = articles.len();
        let work = tokio::task::spawn_blocking(move || {
            crate::export::export_to_markdown(&articles, &summaries, &dir)
        });
        let event = match work.await {
            Ok(Ok(path)) => AppEvent::ExportComplete { path, count },
            Ok(Err(e)) => AppEvent::ExportFailed {
                error: e.to_string(),
            },
            Err(join_err) => {
                report_panic(&tx, "export", join_err.to_string()).await;
                return;
            }
        };
        send_event(&tx, event, "Export").await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{sample, test_app};

    #[tokio::test]
    async fn test_catch_task_panic_ok() {
        assert_eq!(catch_task_panic(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_catch_task_panic_extracts_message() {
        let result: Result<(), String> = catch_task_panic(async { panic!("boom") }).await;
        assert_eq!(result, Err("boom".to_string()));

        let code = 3;
        let result: Result<(), String> =
            catch_task_panic(async move { panic!("failed with {code}") }).await;
        assert_eq!(result, Err("failed with 3".to_string()));
    }

    #[tokio::test]
    async fn test_refresh_rejected_while_in_flight() {
        let mut app = test_app(sample());
        let (tx, _rx) = mpsc::channel(8);
        app.refreshing = true;
        assert!(!spawn_refresh(&mut app, &tx));
    }

    #[tokio::test]
    async fn test_summary_not_restarted_for_same_article() {
        let mut app = test_app(sample());
        let (tx, _rx) = mpsc::channel(8);
        let url = app.view.selected().unwrap().url.clone();

        app.summarizing.insert(url.clone());
        assert!(!spawn_summary(&mut app, &tx));

        app.summarizing.clear();
        app.view.record_summary(url, "done");
        assert!(!spawn_summary(&mut app, &tx));
    }

    #[tokio::test]
    async fn test_export_reports_path() {
        let mut app = test_app(sample());
        let dir = std::env::temp_dir().join("toadman_ui_test_export");
        std::fs::remove_dir_all(&dir).ok();
        app.export_dir = dir.clone();
        let (tx, mut rx) = mpsc::channel(8);

        spawn_export(&app, &tx);
        match rx.recv().await {
            Some(AppEvent::ExportComplete { path, count }) => {
                assert_eq!(count, 4);
                assert!(path.starts_with(&dir));
                assert!(path.exists());
            }
            other => panic!("Expected ExportComplete, got {:?}", other),
        }

        std::fs::remove_dir_all(&dir).ok();
    }
}
