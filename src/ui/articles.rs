use crate::app::{App, Focus, ListRow};
use crate::util::{display_width, strip_control_chars, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Width reserved after the title for the date column.
const DATE_WIDTH: usize = 8;

/// Render the article list: a heading per source with its articles below.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let is_focused = app.focus == Focus::Articles;
    let palette = &app.palette;
    let selected_url = app.view.selected().map(|a| a.url.as_str());
    let inner_width = area.width.saturating_sub(2) as usize;

    let rows = app.display_rows();
    let mut selected_row = None;

    let items: Vec<ListItem> = if rows.is_empty() {
        vec![ListItem::new("No articles")]
    } else {
        rows.iter()
            .enumerate()
            .map(|(i, row)| match row {
                ListRow::Source { name, count } => ListItem::new(Line::from(Span::styled(
                    format!("{} ({})", strip_control_chars(name), count),
                    palette.source_header,
                ))),
                ListRow::Article(article) => {
                    let is_selected = Some(article.url.as_str()) == selected_url;
                    if is_selected {
                        selected_row = Some(i);
                    }
                    let style = if is_selected && is_focused {
                        palette.item_selected
                    } else {
                        palette.item_normal
                    };

                    let mut spans = Vec::with_capacity(4);
                    let marker = if app.view.summary(&article.url).is_some() {
                        Span::styled("* ", palette.article_summarized)
                    } else if app.summarizing.contains(&article.url) {
                        Span::styled("~ ", palette.article_summarized)
                    } else {
                        Span::raw("  ")
                    };
                    let marker_width = display_width(&marker.content);
                    spans.push(marker);

                    let date = article
                        .published
                        .map(|p| p.format("%b %d").to_string())
                        .unwrap_or_default();
                    let max_title = inner_width.saturating_sub(marker_width + DATE_WIDTH);
                    spans.push(Span::styled(
                        truncate_to_width(&strip_control_chars(&article.title), max_title).into_owned(),
                        style,
                    ));
                    if !date.is_empty() {
                        spans.push(Span::styled(format!("  {}", date), palette.article_date));
                    }
                    ListItem::new(Line::from(spans))
                }
            })
            .collect()
    };

    let title = match (app.view.active_category(), app.view.search_text()) {
        (category, "") => format!("{} ({})", category, app.display_articles().len()),
        (category, query) => format!("{} - \"{}\"", category, strip_control_chars(query)),
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border(is_focused))
            .title(title),
    );

    let mut state = ListState::default().with_selected(selected_row);
    f.render_stateful_widget(list, area, &mut state);
}
