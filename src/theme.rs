//! Color palette for the terminal UI.
//!
//! Every styled element reads its `Style` from a semantic role on
//! [`ColorPalette`] rather than hardcoding colors at the call site.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    // -- Sidebar and article list --
    pub item_normal: Style,
    pub item_selected: Style,
    pub item_active: Style,
    pub source_header: Style,
    pub article_date: Style,
    pub article_summarized: Style,

    // -- Detail pane --
    pub detail_heading: Style,
    pub detail_body: Style,
    pub detail_metadata: Style,
    pub detail_summary: Style,
    pub detail_error: Style,

    // -- Chrome --
    pub status_bar: Style,
    pub search_prompt: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
}

impl ColorPalette {
    pub fn dark() -> Self {
        Self {
            item_normal: Style::default(),
            item_selected: Style::default().bg(Color::DarkGray).fg(Color::White),
            item_active: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            source_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            article_date: Style::default().fg(Color::DarkGray),
            article_summarized: Style::default().fg(Color::Yellow),

            detail_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            detail_body: Style::default(),
            detail_metadata: Style::default().fg(Color::DarkGray),
            detail_summary: Style::default().fg(Color::Green),
            detail_error: Style::default().fg(Color::Red),

            status_bar: Style::default().bg(Color::DarkGray).fg(Color::White),
            search_prompt: Style::default().fg(Color::Yellow),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
        }
    }

    /// Border style for a panel given whether it has focus.
    pub fn border(&self, focused: bool) -> Style {
        if focused {
            self.panel_border_focused
        } else {
            self.panel_border
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::dark()
    }
}
