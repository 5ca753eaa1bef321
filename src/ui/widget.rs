//! Chat widget rendering: launcher, header, message bubbles, option menu,
//! FAQ suggestions, and the typing bubble. Reads `ChatState` only; every
//! user action goes back through the controller.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use strum::IntoEnumIterator;

use crate::classify::Category;
use crate::events::{Message, MessageSender};
use crate::state::ChatState;

/// Heading phrase the bot uses for institutional blurbs.
const HEADING_PREFIX: &str = "La Facultad";

pub struct ChatWidget<'a> {
    state: &'a ChatState,
}

impl<'a> ChatWidget<'a> {
    pub fn new(state: &'a ChatState) -> Self {
        Self { state }
    }
}

impl Widget for ChatWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.state.is_open {
            render_launcher(area, buf);
            return;
        }

        let title = if self.state.is_minimized {
            "🤖 Facultad Politécnica — ● En línea (Ctrl+N expandir)"
        } else {
            "🤖 Facultad Politécnica — ● En línea"
        };

        let block = Block::default().borders(Borders::ALL).title(title);
        let inner_area = block.inner(area);
        block.render(area, buf);

        if self.state.is_minimized {
            return;
        }

        let width = inner_area.width.saturating_sub(2) as usize;
        let mut all_lines: Vec<Line> = Vec::new();

        for message in &self.state.messages {
            all_lines.extend(render_message(message, width));
            all_lines.push(Line::from(vec![Span::raw("")]));
        }

        if self.state.is_typing {
            let text = format!("Escribiendo{}", self.state.typing_dots);
            all_lines.push(Line::from(vec![Span::styled(
                text,
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )]));
            all_lines.push(Line::from(vec![Span::raw("")]));
        }

        if self.state.show_options {
            all_lines.extend(render_option_menu());
        }

        if !self.state.faq_questions.is_empty() {
            all_lines.extend(render_faq_panel(self.state, width));
        }

        if !self.state.is_at_start {
            all_lines.push(Line::from(vec![Span::styled(
                "Ctrl+H volver al inicio · Ctrl+X salir",
                Style::default().fg(Color::DarkGray),
            )]));
        }

        // Bottom-anchored: the latest message and any panels stay visible.
        let height = inner_area.height as usize;
        let total = all_lines.len();
        let start = total.saturating_sub(height);
        let visible = &all_lines[start..];

        for (i, line) in visible.iter().enumerate() {
            buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
        }
    }
}

fn render_launcher(area: Rect, buf: &mut Buffer) {
    let block = Block::default().borders(Borders::ALL).title("🤖 Facultad Politécnica");
    let inner_area = block.inner(area);
    block.render(area, buf);

    let lines = vec![
        Line::from(vec![Span::raw("")]),
        Line::from(vec![Span::styled(
            "  CHATEA CON NOSOTROS ●",
            Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD),
        )]),
        Line::from(vec![Span::raw("")]),
        Line::from(vec![Span::styled(
            "  Pulsa Enter para abrir el chat",
            Style::default().fg(Color::Gray),
        )]),
    ];

    for (i, line) in lines.iter().enumerate() {
        if i < inner_area.height as usize {
            buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
        }
    }
}

/// Render a single message into lines
fn render_message(message: &Message, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let (icon, style) = match message.sender {
        MessageSender::User => ("👤", Style::default().fg(Color::Blue)),
        MessageSender::Bot => ("🤖", Style::default().fg(Color::Green)),
    };

    let timestamp = message.timestamp.format("%H:%M:%S").to_string();
    let header = format!("{} {}", icon, timestamp);
    lines.push(Line::from(vec![Span::styled(
        header,
        Style::default().fg(Color::DarkGray),
    )]));

    for visual_line in bullet_lines(&message.text) {
        for wrapped in wrap_text(&visual_line, width) {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(wrapped, style),
            ]));
        }
    }

    lines
}

fn render_option_menu() -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for category in Category::iter() {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                format!("[ {} ]", category.menu_label()),
                Style::default().fg(Color::Cyan),
            ),
        ]));
    }
    lines.push(Line::from(vec![Span::raw("")]));
    lines
}

fn render_faq_panel(state: &ChatState, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if let Some(category) = state.current_category {
        let intro = format!(
            "Oh, elegiste {}, algunas preguntas frecuentes suelen ser:",
            category.canonical_name().to_lowercase()
        );
        for wrapped in wrap_text(&intro, width) {
            lines.push(Line::from(vec![Span::styled(
                wrapped,
                Style::default().fg(Color::Green),
            )]));
        }
    }

    for (i, question) in state.faq_questions.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                format!("[Alt+{}] {}", i + 1, question),
                Style::default().fg(Color::Cyan),
            ),
        ]));
    }

    lines.push(Line::from(vec![Span::styled(
        "Selecciona o formula tu propia duda",
        Style::default().fg(Color::Green),
    )]));
    lines.push(Line::from(vec![Span::raw("")]));

    lines
}

/// Split a bot blurb on its bullet delimiter. Each fragment keeps a bullet
/// prefix unless it reads like a heading: starts with the known heading
/// phrase, starts with an emphasis marker, or ends with a colon.
pub fn bullet_lines(text: &str) -> Vec<String> {
    if !text.contains('•') {
        return vec![text.to_string()];
    }

    text.split('•')
        .filter_map(|segment| {
            let trimmed = segment.trim();
            if trimmed.is_empty() {
                None
            } else if is_heading_line(trimmed) {
                Some(trimmed.to_string())
            } else {
                Some(format!("• {trimmed}"))
            }
        })
        .collect()
}

fn is_heading_line(line: &str) -> bool {
    line.starts_with(HEADING_PREFIX) || line.starts_with('*') || line.ends_with(':')
}

/// Wrap text to fit within the given width
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.chars().count() + word.chars().count() + 1 <= width {
            if !current_line.is_empty() {
                current_line.push(' ');
            }
            current_line.push_str(word);
        } else {
            if !current_line.is_empty() {
                lines.push(current_line);
                current_line = String::new();
            }
            current_line.push_str(word);
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}
