use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Result returned when the user interacts with the composer
#[derive(Debug, PartialEq)]
pub enum ComposerResult {
    Submitted(String),
    Edited,
    None,
}

/// Single-line input box for the chat widget
#[derive(Clone)]
pub struct Composer {
    content: String,
    cursor_position: usize,
    placeholder: String,
    has_focus: bool,
}

impl Composer {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            cursor_position: 0,
            placeholder: placeholder.into(),
            has_focus: true,
        }
    }

    /// Handle key input. Enter submits the trimmed-nonblank buffer.
    pub fn handle_key(&mut self, key: KeyEvent) -> ComposerResult {
        if key.kind != KeyEventKind::Press {
            return ComposerResult::None;
        }

        match key.code {
            KeyCode::Enter => {
                if !self.content.trim().is_empty() {
                    let content = self.content.clone();
                    self.content.clear();
                    self.cursor_position = 0;
                    return ComposerResult::Submitted(content);
                }
            }
            KeyCode::Char(c) => {
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    || key.modifiers.contains(KeyModifiers::ALT)
                {
                    return ComposerResult::None;
                }
                self.insert_char(c);
                return ComposerResult::Edited;
            }
            KeyCode::Backspace => {
                if self.backspace() {
                    return ComposerResult::Edited;
                }
            }
            KeyCode::Delete => {
                if self.delete() {
                    return ComposerResult::Edited;
                }
            }
            KeyCode::Left => {
                if self.cursor_position > 0 {
                    self.cursor_position -= 1;
                }
            }
            KeyCode::Right => {
                if self.cursor_position < self.content.chars().count() {
                    self.cursor_position += 1;
                }
            }
            KeyCode::Home => {
                self.cursor_position = 0;
            }
            KeyCode::End => {
                self.cursor_position = self.content.chars().count();
            }
            _ => {}
        }

        ComposerResult::None
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor_position = 0;
    }

    pub fn set_focus(&mut self, has_focus: bool) {
        self.has_focus = has_focus;
    }

    fn byte_index(&self) -> usize {
        self.content
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_index();
        self.content.insert(at, c);
        self.cursor_position += 1;
    }

    fn backspace(&mut self) -> bool {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let at = self.byte_index();
            self.content.remove(at);
            true
        } else {
            false
        }
    }

    fn delete(&mut self) -> bool {
        if self.cursor_position < self.content.chars().count() {
            let at = self.byte_index();
            self.content.remove(at);
            true
        } else {
            false
        }
    }
}

impl Widget for &Composer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Mensaje")
            .style(if self.has_focus {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Gray)
            });

        let inner_area = block.inner(area);
        block.render(area, buf);

        if self.content.is_empty() {
            let placeholder_line = Line::from(vec![Span::styled(
                self.placeholder.as_str(),
                Style::default().fg(Color::DarkGray),
            )]);
            buf.set_line(inner_area.x, inner_area.y, &placeholder_line, inner_area.width);
        } else {
            let mut content = self.content.clone();
            if self.has_focus {
                let at = content
                    .char_indices()
                    .nth(self.cursor_position)
                    .map(|(i, _)| i)
                    .unwrap_or(content.len());
                content.insert(at, '▌');
            }
            let line = Line::from(vec![Span::raw(content)]);
            buf.set_line(inner_area.x, inner_area.y, &line, inner_area.width);
        }
    }
}
