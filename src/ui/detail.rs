//! Detail pane for the selected article.

use crate::app::App;
use crate::util::{flatten_whitespace, strip_control_chars};
use chrono::Local;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render title, metadata, summary and snippet of the selected article.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let palette = &app.palette;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.panel_border)
        .title("Detail");

    let Some(article) = app.view.selected() else {
        let hint = Paragraph::new("Select an article to see details")
            .style(palette.detail_metadata)
            .block(block);
        f.render_widget(hint, area);
        return;
    };

    let published = article
        .published
        .map(|p| p.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    let mut lines = vec![
        Line::from(Span::styled(
            strip_control_chars(&article.title).into_owned(),
            palette.detail_heading,
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Source:    {}", strip_control_chars(&article.source)),
            palette.detail_metadata,
        )),
        Line::from(Span::styled(
            format!("Category:  {}", strip_control_chars(&article.category)),
            palette.detail_metadata,
        )),
        Line::from(Span::styled(
            format!("Published: {}", published),
            palette.detail_metadata,
        )),
        Line::from(Span::styled(
            format!("URL:       {}", strip_control_chars(&article.url)),
            palette.detail_metadata,
        )),
        Line::from(""),
    ];

    if let Some(summary) = app.view.summary(&article.url) {
        let style = if summary.starts_with("Error:") {
            palette.detail_error
        } else {
            palette.detail_summary
        };
        lines.push(Line::from(Span::styled("Summary", palette.detail_heading)));
        for line in strip_control_chars(summary).lines() {
            lines.push(Line::from(Span::styled(line.to_string(), style)));
        }
        lines.push(Line::from(""));
    } else if app.summarizing.contains(&article.url) {
        lines.push(Line::from(Span::styled(
            "Summarizing...",
            palette.detail_metadata,
        )));
        lines.push(Line::from(""));
    }

    let snippet = flatten_whitespace(&strip_control_chars(&article.snippet));
    if !snippet.is_empty() {
        lines.push(Line::from(Span::styled(snippet, palette.detail_body)));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));
    f.render_widget(paragraph, area);
}
