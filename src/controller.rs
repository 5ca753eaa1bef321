//! Conversation controller: owns the widget state and mediates every
//! transition between user intents, the backend, and the timers.
//!
//! Network calls and delays run as tokio tasks that report back through an
//! event channel; the UI loop feeds those events into `apply`, so all state
//! mutation happens on one loop in a fixed order.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, Duration};
use tracing::error;

use crate::backend::{extract_faq_questions, ChatBackend};
use crate::classify::{classify, Intent};
use crate::config::TimingConfig;
use crate::events::ChatEvent;
use crate::state::ChatState;

pub struct ConversationController {
    state: ChatState,
    backend: Arc<dyn ChatBackend>,
    events_tx: mpsc::UnboundedSender<ChatEvent>,
    typing_task: Option<JoinHandle<()>>,
    reply_task: Option<JoinHandle<()>>,
    /// Bumped on reset; deferred events from older sessions are dropped.
    generation: u64,
    typing_tick: Duration,
    reply_delay: Duration,
    home_delay: Duration,
}

impl ConversationController {
    /// Create a controller and the receiver the UI loop drains.
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        timing: &TimingConfig,
    ) -> (Self, mpsc::UnboundedReceiver<ChatEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let controller = Self {
            state: ChatState::new(),
            backend,
            events_tx,
            typing_task: None,
            reply_task: None,
            generation: 0,
            typing_tick: Duration::from_millis(timing.typing_tick_ms),
            reply_delay: Duration::from_millis(timing.reply_delay_ms),
            home_delay: Duration::from_millis(timing.home_delay_ms),
        };

        (controller, events_rx)
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    /// Mirror the composer's buffer into the session draft.
    pub fn set_draft(&mut self, draft: String) {
        self.state.input_draft = draft;
    }

    /// Open the widget and fetch the greeting. No-op if already open.
    pub fn open(&mut self) {
        if self.state.is_open {
            return;
        }
        self.state.is_open = true;
        self.fetch_greeting();
    }

    /// Flip minimized; the message log is untouched.
    pub fn toggle_minimize(&mut self) {
        self.state.is_minimized = !self.state.is_minimized;
    }

    /// Ask the backend for the start-screen greeting. On failure the error is
    /// logged and the state is left unchanged; there is no retry.
    pub fn fetch_greeting(&mut self) {
        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();
        let generation = self.generation;

        tokio::spawn(async move {
            match backend.greeting().await {
                Ok(text) => {
                    let _ = tx.send(ChatEvent::GreetingLoaded { text, generation });
                }
                Err(e) => error!("Error fetching greeting: {e:#}"),
            }
        });
    }

    /// The core transition: append the user's message, start the typing
    /// animation, classify, and dispatch to the backend.
    ///
    /// `raw` comes from a button press; `None` consumes the input draft.
    /// Blank input is a guard-clause no-op: nothing appended, no request.
    pub fn send(&mut self, raw: Option<String>) {
        let user_message = raw.unwrap_or_else(|| self.state.input_draft.clone());
        if user_message.trim().is_empty() {
            return;
        }

        self.state.push_user_message(user_message.clone());
        self.start_typing();

        // Only the newest send may mutate state: drop the previous in-flight
        // reply before spawning the next one.
        if let Some(task) = self.reply_task.take() {
            task.abort();
        }

        let backend = Arc::clone(&self.backend);
        let tx = self.events_tx.clone();
        let generation = self.generation;
        let reply_delay = self.reply_delay;
        let home_delay = self.home_delay;

        let task = match classify(&user_message) {
            Intent::Category(category) => tokio::spawn(async move {
                match backend.category(category).await {
                    Ok(body) => {
                        let questions = extract_faq_questions(&body);
                        // Let the typing animation play before the reveal.
                        sleep(reply_delay).await;
                        let _ = tx.send(ChatEvent::FaqReady {
                            category,
                            questions,
                            generation,
                        });
                    }
                    Err(e) => {
                        error!("Error fetching category: {e:#}");
                        let _ = tx.send(ChatEvent::RequestFailed { generation });
                    }
                }
            }),
            Intent::GoHome => tokio::spawn(async move {
                sleep(home_delay).await;
                let _ = tx.send(ChatEvent::HomeRequested { generation });
            }),
            Intent::FreeText => tokio::spawn(async move {
                match backend.respond(&user_message).await {
                    Ok(text) => {
                        sleep(reply_delay).await;
                        let _ = tx.send(ChatEvent::BotReply { text, generation });
                    }
                    Err(e) => {
                        error!("Error fetching response: {e:#}");
                        let _ = tx.send(ChatEvent::RequestFailed { generation });
                    }
                }
            }),
        };

        self.reply_task = Some(task);
    }

    /// Apply a completed piece of deferred work on the UI loop.
    pub fn apply(&mut self, event: ChatEvent) {
        if event.generation() != self.generation {
            return;
        }

        match event {
            ChatEvent::TypingTick { .. } => self.state.advance_typing_dots(),
            ChatEvent::GreetingLoaded { text, .. } => self.state.apply_greeting(text),
            ChatEvent::FaqReady {
                category,
                questions,
                ..
            } => {
                self.stop_typing();
                self.state.show_faq(category, questions);
            }
            ChatEvent::BotReply { text, .. } => {
                self.stop_typing();
                self.state.push_bot_message(text);
            }
            ChatEvent::HomeRequested { .. } => {
                self.stop_typing();
                self.fetch_greeting();
            }
            ChatEvent::RequestFailed { .. } => self.stop_typing(),
        }

        debug_assert!(self.state.panels_exclusive());
    }

    /// Cancel the dots timer and clear the indicator. Idempotent: safe to
    /// call when no timer is running.
    pub fn stop_typing(&mut self) {
        if let Some(task) = self.typing_task.take() {
            task.abort();
        }
        self.state.stop_typing();
    }

    /// Exit action: tear down timers, invalidate in-flight work, and return
    /// every field to its initial value.
    pub fn reset(&mut self) {
        self.generation += 1;
        if let Some(task) = self.typing_task.take() {
            task.abort();
        }
        if let Some(task) = self.reply_task.take() {
            task.abort();
        }
        self.state.reset();
    }

    fn start_typing(&mut self) {
        if let Some(task) = self.typing_task.take() {
            task.abort();
        }
        self.state.start_typing();

        let tx = self.events_tx.clone();
        let generation = self.generation;
        let tick = self.typing_tick;

        self.typing_task = Some(tokio::spawn(async move {
            let mut ticker = interval(tick);
            // First tick completes immediately; skip it so dots start empty.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(ChatEvent::TypingTick { generation }).is_err() {
                    break;
                }
            }
        }));
    }
}
