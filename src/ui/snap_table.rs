use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Widget};
use unicode_width::UnicodeWidthChar;

use crate::api::types::Snap;
use crate::app::App;
use crate::ui::{action_label, format_timestamp};

const STATUS_WIDTH: usize = 15;
const AUTHOR_WIDTH: usize = 16;
const DATE_WIDTH: usize = 17;

/// The filtered snap list as a one-row-per-snap table with selection highlight.
pub struct SnapTable<'a> {
    pub app: &'a App,
}

impl<'a> SnapTable<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for SnapTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = &self.app.view;
        let snaps = view.filtered();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Snaps ({}/{}) ", snaps.len(), view.all_snaps().len()))
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width < 2 {
            return;
        }

        if snaps.is_empty() {
            let msg = if view.is_loading() {
                "Loading..."
            } else {
                "No snaps match the current filter"
            };
            buf.set_string(
                inner.x + 1,
                inner.y,
                msg,
                Style::default().fg(Color::DarkGray),
            );
            return;
        }

        let content_width = inner.width.saturating_sub(1) as usize; // 1 char left margin
        let message_width =
            content_width.saturating_sub(STATUS_WIDTH + AUTHOR_WIDTH + DATE_WIDTH + 3);

        let header = Line::from(vec![
            Span::raw(pad("Status", STATUS_WIDTH)),
            Span::raw(" "),
            Span::raw(pad("Message", message_width)),
            Span::raw(" "),
            Span::raw(pad("Author", AUTHOR_WIDTH)),
            Span::raw(" "),
            Span::raw(pad("Created", DATE_WIDTH)),
        ])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
        buf.set_line(inner.x + 1, inner.y, &header, content_width as u16);

        let visible_rows = inner.height.saturating_sub(1) as usize;
        let selected = view.selected_index;
        let start = scroll_start(selected, snaps.len(), visible_rows);

        for (row, (idx, snap)) in snaps
            .iter()
            .enumerate()
            .skip(start)
            .take(visible_rows)
            .enumerate()
        {
            let y = inner.y + 1 + row as u16;
            let line = self.row_line(snap, idx == selected, message_width);
            buf.set_line(inner.x + 1, y, &line, content_width as u16);
        }
    }
}

impl SnapTable<'_> {
    fn row_line(&self, snap: &Snap, selected: bool, message_width: usize) -> Line<'static> {
        let pending = self.app.view.is_pending(&snap.id);

        let status_style = match (pending, snap.is_blocked) {
            (true, _) => Style::default().fg(Color::Yellow),
            (false, true) => Style::default().fg(Color::Red),
            (false, false) => Style::default().fg(Color::Green),
        };
        let status = status_text(snap.is_blocked, pending);

        let base = if selected {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::styled(pad(&status, STATUS_WIDTH), status_style.patch(base)),
            Span::styled(" ", base),
            Span::styled(pad(&one_line(&snap.message), message_width), base),
            Span::styled(" ", base),
            Span::styled(pad(&format!("@{}", snap.username), AUTHOR_WIDTH), base),
            Span::styled(" ", base),
            Span::styled(
                pad(
                    &format_timestamp(snap.created_at, &self.app.config.date_format),
                    DATE_WIDTH,
                ),
                base.fg(if selected { Color::Cyan } else { Color::DarkGray }),
            ),
        ])
    }
}

/// First row index to draw so that `selected` stays on screen.
fn scroll_start(selected: usize, len: usize, visible: usize) -> usize {
    if len == 0 || visible == 0 {
        return 0;
    }
    let selected = selected.min(len - 1);
    (selected + 1).saturating_sub(visible)
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Block-state marker followed by the row's action label.
fn status_text(blocked: bool, pending: bool) -> String {
    let marker = if blocked { "\u{25cf}" } else { "\u{25cb}" };
    format!("{marker} {}", action_label(blocked, pending))
}

/// Truncate or right-pad `text` to exactly `width` display columns, adding an
/// ellipsis when cut.
fn pad(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();

    if total <= width {
        out.push_str(text);
        used = total;
    } else {
        for c in text.chars() {
            let w = c.width().unwrap_or(0);
            if used + w + 1 > width {
                break;
            }
            out.push(c);
            used += w;
        }
        out.push('\u{2026}');
        used += 1;
    }

    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}
