use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthChar;

/// A simple single-line text input renderer.
///
/// Renders the prompt + text content, with a cursor block at the end while
/// focused. Text wider than the area scrolls so the cursor stays visible.
pub struct TextInput<'a> {
    pub prompt: &'a str,
    pub text: &'a str,
    pub placeholder: Option<&'a str>,
    pub focused: bool,
    pub style: Style,
}

impl<'a> TextInput<'a> {
    pub fn new(prompt: &'a str, text: &'a str) -> Self {
        Self {
            prompt,
            text,
            placeholder: None,
            focused: true,
            style: Style::default().fg(Color::White),
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }
}

impl Widget for TextInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        if self.text.is_empty()
            && !self.focused
            && let Some(placeholder) = self.placeholder
        {
            let (x, _) = buf.set_stringn(
                area.x,
                area.y,
                self.prompt,
                area.width as usize,
                self.style,
            );
            let used = x.saturating_sub(area.x);
            buf.set_stringn(
                x,
                area.y,
                placeholder,
                area.width.saturating_sub(used) as usize,
                Style::default().fg(Color::DarkGray),
            );
            return;
        }

        let cursor = if self.focused { "\u{2588}" } else { "" };
        let display = format!("{}{}{cursor}", self.prompt, self.text);
        let visible = tail_fitting(&display, area.width as usize);
        let style = if self.focused {
            self.style
        } else {
            self.style.fg(Color::Gray)
        };

        buf.set_string(area.x, area.y, visible, style);
    }
}

/// The longest suffix of `s` that fits in `width` display columns.
fn tail_fitting(s: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = s.len();
    for (i, c) in s.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = i;
    }
    &s[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_fitting_respects_char_boundaries() {
        assert_eq!(tail_fitting("hello", 10), "hello");
        assert_eq!(tail_fitting("hello", 3), "llo");
        assert_eq!(tail_fitting("añb", 2), "ñb");
        assert_eq!(tail_fitting("日本語", 5), "本語");
        assert_eq!(tail_fitting("abc", 0), "");
    }

    #[test]
    fn renders_placeholder_when_unfocused_and_empty() {
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        TextInput::new("To: ", "")
            .focused(false)
            .placeholder("YYYY-MM-DD")
            .render(area, &mut buf);
        let line: String = (0..20).map(|x| buf[(x, 0)].symbol()).collect();
        assert_eq!(line.trim_end(), "To: YYYY-MM-DD");
    }

    #[test]
    fn focused_input_shows_cursor() {
        let area = Rect::new(0, 0, 12, 1);
        let mut buf = Buffer::empty(area);
        TextInput::new("/", "rust").render(area, &mut buf);
        let line: String = (0..12).map(|x| buf[(x, 0)].symbol()).collect();
        assert_eq!(line.trim_end(), "/rust\u{2588}");
    }
}
