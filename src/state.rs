//! Widget-session state and its transitions.
//!
//! One `ChatState` per widget session, owned by the controller and mutated
//! only through the methods here. The option menu and the FAQ list are
//! mutually exclusive panels: no transition leaves both populated.

use crate::classify::Category;
use crate::events::Message;

/// All client-side state for one chat widget session.
#[derive(Debug, Clone)]
pub struct ChatState {
    pub messages: Vec<Message>,
    pub input_draft: String,
    pub is_open: bool,
    pub is_minimized: bool,
    pub is_at_start: bool,
    pub show_options: bool,
    pub faq_questions: Vec<String>,
    pub current_category: Option<Category>,
    pub is_typing: bool,
    pub typing_dots: String,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            input_draft: String::new(),
            is_open: false,
            is_minimized: false,
            // Matches the widget's initial screen: back/exit controls hidden
            // until the first user message.
            is_at_start: true,
            show_options: false,
            faq_questions: Vec::new(),
            current_category: None,
            is_typing: false,
            typing_dots: String::new(),
        }
    }
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the log with the greeting and show the category menu.
    pub fn apply_greeting(&mut self, text: impl Into<String>) {
        self.messages = vec![Message::bot(text)];
        self.show_options = true;
        self.faq_questions.clear();
        self.current_category = None;
        self.is_at_start = true;
    }

    /// Append the user's message and leave the start screen. Both panels are
    /// hidden until the reply arrives.
    pub fn push_user_message(&mut self, text: impl Into<String>) {
        self.messages.push(Message::user(text));
        self.is_at_start = false;
        self.show_options = false;
        self.faq_questions.clear();
        self.current_category = None;
        self.input_draft.clear();
    }

    pub fn push_bot_message(&mut self, text: impl Into<String>) {
        self.messages.push(Message::bot(text));
    }

    /// Show the FAQ suggestions for a category.
    pub fn show_faq(&mut self, category: Category, questions: Vec<String>) {
        self.show_options = false;
        self.faq_questions = questions;
        self.current_category = Some(category);
    }

    pub fn start_typing(&mut self) {
        self.is_typing = true;
        self.typing_dots.clear();
    }

    /// Cycle the indicator through 0..=3 dots.
    pub fn advance_typing_dots(&mut self) {
        if !self.is_typing {
            return;
        }
        if self.typing_dots.len() >= 3 {
            self.typing_dots.clear();
        } else {
            self.typing_dots.push('.');
        }
    }

    /// Idempotent: clearing an already-stopped indicator is a no-op.
    pub fn stop_typing(&mut self) {
        self.is_typing = false;
        self.typing_dots.clear();
    }

    /// Full teardown used by the exit action: back to the closed widget.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Session-active panels never overlap; used by debug assertions and tests.
    pub fn panels_exclusive(&self) -> bool {
        !(self.show_options && !self.faq_questions.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::MessageSender;

    #[test]
    fn greeting_resets_to_start_screen() {
        let mut state = ChatState::new();
        state.push_user_message("hola");
        state.push_bot_message("respuesta");

        state.apply_greeting("Bienvenido");

        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].text, "Bienvenido");
        assert_eq!(state.messages[0].sender, MessageSender::Bot);
        assert!(state.show_options);
        assert!(state.is_at_start);
        assert!(state.faq_questions.is_empty());
        assert!(state.panels_exclusive());
    }

    #[test]
    fn user_message_leaves_start_and_hides_panels() {
        let mut state = ChatState::new();
        state.apply_greeting("Bienvenido");
        state.input_draft = "2".to_string();

        state.push_user_message("2");

        assert!(!state.is_at_start);
        assert!(!state.show_options);
        assert!(state.input_draft.is_empty());
        assert_eq!(state.messages.last().unwrap().sender, MessageSender::User);
    }

    #[test]
    fn faq_replaces_option_menu() {
        let mut state = ChatState::new();
        state.apply_greeting("Bienvenido");
        state.push_user_message("2");

        state.show_faq(
            Category::Carreras,
            vec!["¿Cuánto cuesta?".to_string(), "¿Dónde queda?".to_string()],
        );

        assert!(!state.show_options);
        assert_eq!(state.faq_questions.len(), 2);
        assert_eq!(state.current_category, Some(Category::Carreras));
        assert!(state.panels_exclusive());
    }

    #[test]
    fn typing_dots_cycle_through_four_steps() {
        let mut state = ChatState::new();
        state.start_typing();

        let mut seen = Vec::new();
        for _ in 0..5 {
            state.advance_typing_dots();
            seen.push(state.typing_dots.clone());
        }
        assert_eq!(seen, vec![".", "..", "...", "", "."]);
    }

    #[test]
    fn dots_do_not_advance_when_not_typing() {
        let mut state = ChatState::new();
        state.advance_typing_dots();
        assert!(state.typing_dots.is_empty());
        assert!(!state.is_typing);
    }

    #[test]
    fn stop_typing_is_idempotent() {
        let mut state = ChatState::new();
        state.start_typing();
        state.advance_typing_dots();

        state.stop_typing();
        let after_first = state.clone();
        state.stop_typing();

        assert!(!state.is_typing);
        assert!(state.typing_dots.is_empty());
        assert_eq!(state.is_typing, after_first.is_typing);
        assert_eq!(state.typing_dots, after_first.typing_dots);
    }

    #[test]
    fn reset_clears_every_field() {
        let mut state = ChatState::new();
        state.is_open = true;
        state.apply_greeting("Bienvenido");
        state.push_user_message("hola");
        state.start_typing();

        state.reset();

        assert!(state.messages.is_empty());
        assert!(!state.is_open);
        assert!(!state.is_typing);
        assert!(state.input_draft.is_empty());
        assert!(state.faq_questions.is_empty());
        assert!(state.current_category.is_none());
    }
}
