//! Help overlay with the key table.

use crate::app::App;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Row, Table},
    Frame,
};

/// Key bindings shown in the help overlay, in display order.
#[rustfmt::skip]
const BINDINGS: &[(&str, &str)] = &[
    ("j / Down",   "Move down"),
    ("k / Up",     "Move up"),
    ("Tab",        "Switch between categories and articles"),
    ("Enter",      "Apply category / select article"),
    ("/",          "Search titles and sources"),
    ("Esc",        "Clear search"),
    ("Ctrl+d/u",   "Scroll detail pane"),
    ("s",          "Summarize selected article"),
    ("e",          "Export visible articles to markdown"),
    ("o",          "Open selected article in browser"),
    ("r",          "Refresh (bypass cache)"),
    ("?",          "Toggle help"),
    ("q",          "Quit"),
];

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(70, 70, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let rows: Vec<Row> = BINDINGS
        .iter()
        .map(|(key, description)| Row::new(vec![format!("  {}", key), description.to_string()]))
        .collect();

    let widths = [Constraint::Length(14), Constraint::Min(20)];
    let table = Table::new(rows, widths)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.palette.panel_border_focused)
                .title(" Help (? to close) "),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                )
                .bottom_margin(1),
        )
        .style(app.palette.detail_body);

    f.render_widget(table, overlay);
}

/// Create a centered rectangle with the given percentage of the parent area.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_within_parent() {
        let parent = Rect::new(0, 0, 100, 50);
        let rect = centered_rect(70, 70, parent);
        assert_eq!(rect, Rect::new(15, 7, 70, 35));
    }
}
