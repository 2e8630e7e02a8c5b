use crate::app::App;
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if app.search_mode {
        Cow::Owned(format!(
            "/{}_  ESC clear | ENTER keep",
            app.view.search_text()
        ))
    } else if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.refreshing {
        Cow::Borrowed("Refreshing...")
    } else {
        Cow::Borrowed("[j/k]move [Tab]panel [/]search [s]ummarize [e]xport [o]pen [r]efresh [?]help [q]uit")
    };

    let style = if app.search_mode {
        app.palette.search_prompt
    } else {
        app.palette.status_bar
    };

    f.render_widget(Paragraph::new(text).style(style), area);
}
