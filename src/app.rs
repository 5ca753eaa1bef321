//! Application event loop.
//!
//! Converts terminal events into controller intents, drains the controller's
//! deferred-work channel, and renders once per iteration. All state mutation
//! happens here, on one loop.

use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::sync::mpsc;
use tokio::time::Duration;

use crate::backend::HttpChatBackend;
use crate::config::Config;
use crate::controller::ConversationController;
use crate::events::ChatEvent;
use crate::ui::{ChatWidget, Composer, ComposerResult};

pub struct App {
    controller: ConversationController,
    chat_events: mpsc::UnboundedReceiver<ChatEvent>,
    composer: Composer,
    running: bool,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let backend = Arc::new(HttpChatBackend::new(config.backend_base_url.clone()));
        let (controller, chat_events) = ConversationController::new(backend, &config.timing);

        Self {
            controller,
            chat_events,
            composer: Composer::new("Escribe un mensaje..."),
            running: true,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        self.render(terminal)?;

        while self.running {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        if let Event::Key(key) = event {
                            if key.kind == KeyEventKind::Press {
                                self.handle_key(key);
                            }
                        }
                    }
                }

                maybe_chat = self.chat_events.recv() => {
                    if let Some(chat_event) = maybe_chat {
                        self.controller.apply(chat_event);
                        // Apply whatever else is already queued before drawing.
                        while let Ok(chat_event) = self.chat_events.try_recv() {
                            self.controller.apply(chat_event);
                        }
                    }
                }

                _ = tokio::time::sleep(Duration::from_millis(100)) => {}
            }

            self.render(terminal)?;
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => {
                    self.running = false;
                    return;
                }
                KeyCode::Char('n') => {
                    if self.controller.state().is_open {
                        self.controller.toggle_minimize();
                    }
                    return;
                }
                KeyCode::Char('h') => {
                    // "Volver al inicio" button; only offered mid-conversation.
                    if self.controller.state().is_open && !self.controller.state().is_at_start {
                        self.controller.send(Some("inicio".to_string()));
                    }
                    return;
                }
                KeyCode::Char('x') => {
                    if self.controller.state().is_open {
                        self.controller.reset();
                        self.composer.clear();
                    }
                    return;
                }
                _ => return,
            }
        }

        if !self.controller.state().is_open {
            if key.code == KeyCode::Enter {
                self.controller.open();
            }
            return;
        }

        if key.modifiers.contains(KeyModifiers::ALT) {
            if let KeyCode::Char(c) = key.code {
                if let Some(digit) = c.to_digit(10) {
                    let index = digit.saturating_sub(1) as usize;
                    if let Some(question) = self.controller.state().faq_questions.get(index) {
                        self.controller.send(Some(question.clone()));
                    }
                }
            }
            return;
        }

        match self.composer.handle_key(key) {
            ComposerResult::Submitted(content) => {
                self.controller.send(Some(content));
            }
            ComposerResult::Edited => {
                self.controller.set_draft(self.composer.content().to_string());
            }
            ComposerResult::None => {}
        }
    }

    fn render(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        let state = self.controller.state();
        let composer = &self.composer;

        terminal.draw(|frame| {
            let area = frame.size();

            if state.is_open && !state.is_minimized {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(10), Constraint::Length(3)])
                    .split(area);

                frame.render_widget(ChatWidget::new(state), chunks[0]);
                frame.render_widget(composer, chunks[1]);
            } else {
                frame.render_widget(ChatWidget::new(state), area);
            }
        })?;

        Ok(())
    }
}
