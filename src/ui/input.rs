//! Input handling for the TUI.
//!
//! Keys are routed by mode: the help overlay captures everything while
//! visible, then search mode, then the browse bindings.

use crate::app::{App, AppEvent};
use crate::util::{validate_url_for_open, MAX_SEARCH_QUERY_LENGTH};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{spawn_export, spawn_refresh, spawn_summary};
use super::Action;

/// Lines scrolled by Ctrl+d / Ctrl+u in the detail pane.
const DETAIL_PAGE: u16 = 10;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    // Help overlay captures all keys when visible
    if app.show_help {
        if matches!(
            code,
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')
        ) {
            app.show_help = false;
        }
        return Action::Continue;
    }

    if app.search_mode {
        handle_search_input(app, code);
        return Action::Continue;
    }

    handle_browse_input(app, code, modifiers, event_tx)
}

/// Typing filters live; Enter keeps the filter, Esc drops it.
fn handle_search_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.clear_search(),
        KeyCode::Enter => app.confirm_search(),
        KeyCode::Backspace => {
            let mut text = app.view.search_text().to_string();
            if text.pop().is_some() {
                app.update_search(text);
            }
        }
        KeyCode::Char(c) => {
            if app.view.search_text().chars().count() >= MAX_SEARCH_QUERY_LENGTH {
                app.set_status(format!(
                    "Search query limited to {} characters",
                    MAX_SEARCH_QUERY_LENGTH
                ));
                return;
            }
            let mut text = app.view.search_text().to_string();
            text.push(c);
            app.update_search(text);
        }
        _ => {}
    }
}

fn handle_browse_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('d') if ctrl => app.scroll_detail_down(DETAIL_PAGE),
        KeyCode::Char('u') if ctrl => app.scroll_detail_up(DETAIL_PAGE),
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::PageDown => app.scroll_detail_down(DETAIL_PAGE),
        KeyCode::PageUp => app.scroll_detail_up(DETAIL_PAGE),
        KeyCode::Tab | KeyCode::BackTab => app.toggle_focus(),
        KeyCode::Enter => app.activate(),
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Esc => app.clear_search(),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('r') => {
            if spawn_refresh(app, event_tx) {
                app.set_status("Refreshing...");
            } else {
                app.set_status("Refresh already in progress");
            }
        }
        KeyCode::Char('s') => summarize_selected(app, event_tx),
        KeyCode::Char('e') => {
            if app.display_articles().is_empty() {
                app.set_status("Nothing to export");
            } else {
                spawn_export(app, event_tx);
                app.set_status("Exporting...");
            }
        }
        KeyCode::Char('o') => open_selected(app),
        _ => {}
    }
    Action::Continue
}

fn summarize_selected(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let Some(url) = app.view.selected().map(|a| a.url.clone()) else {
        app.set_status("No article selected");
        return;
    };
    if spawn_summary(app, event_tx) {
        app.set_status("Summarizing...");
    } else if app.summarizing.contains(&url) {
        app.set_status("Summary already in progress");
    } else {
        app.set_status("Already summarized");
    }
}

fn open_selected(app: &mut App) {
    let Some(url) = app.view.selected().map(|a| a.url.clone()) else {
        app.set_status("No article selected");
        return;
    };
    if let Err(e) = validate_url_for_open(&url) {
        app.set_status(format!("Cannot open link: {}", e));
    } else if let Err(e) = open::that(&url) {
        tracing::warn!(url = %url, error = %e, "Failed to open browser");
        app.set_status(format!("Failed to open browser: {}", e));
    }
}
