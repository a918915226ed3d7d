use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::app::{App, AppMode};
use crate::filter::FilterMode;
use crate::ui::input::TextInput;

/// Top bar: filter-mode tabs followed by the search box, or the date range
/// inputs in date mode.
pub struct FilterBar<'a> {
    pub app: &'a App,
}

impl<'a> FilterBar<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for FilterBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let current = self.app.view.filter.mode();
        let mut spans = Vec::new();
        for (key, mode) in [
            ('1', FilterMode::Message),
            ('2', FilterMode::Username),
            ('3', FilterMode::CreatedAt),
        ] {
            let style = if mode == current {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(format!(" {key}:{} ", mode.label()), style));
            spans.push(Span::raw(" "));
        }

        let tabs = Line::from(spans);
        let tabs_width = tabs.width() as u16;
        buf.set_line(area.x, area.y, &tabs, area.width);

        let rest = Rect::new(
            area.x + tabs_width.min(area.width),
            area.y,
            area.width.saturating_sub(tabs_width),
            1,
        );
        if rest.width == 0 {
            return;
        }

        let mode = self.app.mode;
        if current == FilterMode::CreatedAt {
            let half = rest.width / 2;
            let from = Rect::new(rest.x, rest.y, half, 1);
            let to = Rect::new(rest.x + half, rest.y, rest.width - half, 1);
            date_input("From: ", &self.app.start_input, mode == AppMode::StartDate)
                .render(from, buf);
            date_input("To: ", &self.app.end_input, mode == AppMode::EndDate).render(to, buf);
        } else {
            let term = if mode == AppMode::Search {
                self.app.search_input.as_str()
            } else {
                self.app.view.filter.term()
            };
            if term.is_empty() && mode != AppMode::Search {
                buf.set_string(
                    rest.x,
                    rest.y,
                    "(press / to search)",
                    Style::default().fg(Color::DarkGray),
                );
            } else {
                TextInput::new("Search: ", term)
                    .focused(mode == AppMode::Search)
                    .render(rest, buf);
            }
        }
    }
}

fn date_input<'a>(label: &'a str, text: &'a str, focused: bool) -> TextInput<'a> {
    let input = TextInput::new(label, text).focused(focused);
    if text.is_empty() && !focused {
        input.placeholder("YYYY-MM-DD")
    } else {
        input
    }
}
