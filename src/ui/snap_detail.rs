use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};

use crate::api::types::Snap;
use crate::ui::{action_label, format_timestamp};

/// Centered overlay with every field of one snap.
///
/// Layout:
///   Message
///   <message text, wrapped>
///
///   Author:   @username
///   Email:    ...
///   Likes:    12
///   Created:  2024-02-10 08:05
///   Hashtags: rust, tui
///   Status:   Blocked
pub struct SnapDetail<'a> {
    pub snap: &'a Snap,
    pub date_format: &'a str,
    pub pending: bool,
}

impl<'a> SnapDetail<'a> {
    pub fn new(snap: &'a Snap, date_format: &'a str) -> Self {
        Self {
            snap,
            date_format,
            pending: false,
        }
    }

    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = pending;
        self
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let label_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let field = |label: &'static str, value: String| {
            Line::from(vec![
                Span::styled(format!("{label:<10}"), label_style),
                Span::raw(value),
            ])
        };

        let status = if self.snap.is_blocked {
            Span::styled("Blocked", Style::default().fg(Color::Red))
        } else {
            Span::styled("Unblocked", Style::default().fg(Color::Green))
        };

        let mut lines = vec![Line::from(Span::styled("Message", label_style))];
        lines.extend(self.snap.message.lines().map(Line::raw));
        lines.push(Line::raw(""));
        lines.push(field("Author:", format!("@{}", self.snap.username)));
        lines.push(field("Email:", self.snap.email.clone()));
        lines.push(field("Likes:", self.snap.likes.to_string()));
        lines.push(field(
            "Created:",
            format_timestamp(self.snap.created_at, self.date_format),
        ));
        lines.push(field("Hashtags:", self.snap.hashtags.to_string()));
        lines.push(Line::from(vec![
            Span::styled(format!("{:<10}", "Status:"), label_style),
            status,
        ]));
        lines
    }
}

impl Widget for SnapDetail<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = 70u16.min(area.width.saturating_sub(4));
        let height = 18u16.min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let panel = Rect::new(x, y, width, height);

        Clear.render(panel, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Snap Details ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(panel);
        block.render(panel, buf);

        if inner.height < 2 {
            return;
        }
        let text_area = Rect::new(inner.x, inner.y, inner.width, inner.height - 1);
        let hint_area = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);

        Paragraph::new(self.lines())
            .wrap(Wrap { trim: false })
            .render(text_area, buf);

        let hint = Line::from(Span::styled(
            format!(
                " b: {}   Esc/Enter: close ",
                action_label(self.snap.is_blocked, self.pending)
            ),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
        Paragraph::new(hint).render(hint_area, buf);
    }
}
