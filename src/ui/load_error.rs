use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};

/// Page-level panel shown when the initial snap load fails. There is no retry;
/// the only way out is quitting.
pub struct LoadErrorView<'a> {
    text: &'a str,
}

impl<'a> LoadErrorView<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }
}

impl Widget for LoadErrorView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Could not load snaps ")
            .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(Color::Red));

        let inner = block.inner(area);
        block.render(area, buf);

        // Reserve the last line of inner area for the quit hint
        if inner.height < 2 {
            return;
        }
        let text_area = Rect::new(
            inner.x + 1,
            inner.y,
            inner.width.saturating_sub(2),
            inner.height - 1,
        );
        let hint_area = Rect::new(
            inner.x + 1,
            inner.y + inner.height - 1,
            inner.width.saturating_sub(2),
            1,
        );

        let paragraph = Paragraph::new(self.text)
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true });
        paragraph.render(text_area, buf);

        let hint = Line::from(Span::styled(
            "Press q to quit",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
        Paragraph::new(hint).render(hint_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shows_message_and_hint() {
        let area = Rect::new(0, 0, 50, 6);
        let mut buf = Buffer::empty(area);
        LoadErrorView::new("API error (status 500): database offline").render(area, &mut buf);
        let text: String = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("Could not load snaps"));
        assert!(text.contains("database offline"));
        assert!(text.contains("Press q to quit"));
    }
}
