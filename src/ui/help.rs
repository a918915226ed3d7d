use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget};

/// Help overlay showing keybindings.
#[derive(Default)]
pub struct HelpView;

impl HelpView {
    pub fn new() -> Self {
        Self
    }
}

/// Keybinding sections as (title, [(keys, description)]).
const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("j/Down", "Move down"),
            ("k/Up", "Move up"),
            ("Enter", "Snap details"),
            ("Esc/q", "Close overlay / quit"),
        ],
    ),
    ("Moderation", &[("b", "Block / unblock snap")]),
    (
        "Filters",
        &[
            ("1 / 2 / 3", "By message / author / date"),
            ("/", "Edit search term"),
            ("f / t", "Edit from / to date"),
            ("Tab", "Switch date field"),
        ],
    ),
    (
        "Input",
        &[
            (":", "Command mode"),
            ("?", "This help screen"),
            ("Ctrl-C", "Quit"),
        ],
    ),
];

impl Widget for HelpView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let key_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(Color::White);
        let section_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        let mut lines: Vec<Line<'_>> = Vec::new();
        for (i, (title, bindings)) in SECTIONS.iter().enumerate() {
            if i > 0 {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(*title, section_style)));
            lines.extend(
                bindings
                    .iter()
                    .map(|(key, desc)| binding_line(key, desc, key_style, desc_style)),
            );
        }

        // Center a panel sized to the content (or fit to area)
        let width = 56u16.min(area.width.saturating_sub(4));
        let height = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let panel = Rect::new(x, y, width, height);

        Clear.render(panel, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Help - Keybindings ")
            .title_style(section_style)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(panel);
        block.render(panel, buf);
        Paragraph::new(lines).render(inner, buf);
    }
}

fn binding_line<'a>(key: &'a str, desc: &'a str, key_style: Style, desc_style: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {key:<12}"), key_style),
        Span::styled(desc, desc_style),
    ])
}
