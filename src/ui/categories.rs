use crate::app::{App, Focus};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render the category sidebar.
///
/// The cursor row is highlighted while the sidebar has focus; the active
/// filter is always marked.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let is_focused = app.focus == Focus::Categories;
    let palette = &app.palette;
    let active = app.view.active_category();

    let items: Vec<ListItem> = app
        .view
        .categories()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let style = if is_focused && i == app.category_index {
                palette.item_selected
            } else if *name == active {
                palette.item_active
            } else {
                palette.item_normal
            };
            let marker = if *name == active { "> " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(*name, style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border(is_focused))
                .title("Categories"),
        )
        .highlight_style(Style::default());

    let mut state = ListState::default().with_selected(Some(app.category_index));
    f.render_stateful_widget(list, area, &mut state);
}
