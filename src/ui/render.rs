//! Render functions for the TUI.
//!
//! Lays out the category sidebar, the grouped article list, the detail pane
//! and the status bar, then draws the help overlay on top when active.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Frame,
};

use super::{articles, categories, detail, help, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 60;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Width of the category sidebar in columns.
const SIDEBAR_WIDTH: u16 = 18;

pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    render_main_panels(f, app, rows[0]);
    status::render(f, app, rows[1]);

    if app.show_help {
        help::render(f, app);
    }
}

/// Three columns: categories | articles | detail.
fn render_main_panels(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(SIDEBAR_WIDTH),
            Constraint::Percentage(45),
            Constraint::Min(0),
        ])
        .split(area);

    categories::render(f, app, columns[0]);
    articles::render(f, app, columns[1]);
    detail::render(f, app, columns[2]);
}
