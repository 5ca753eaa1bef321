use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::Category;

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageSender {
    User,
    Bot,
}

/// A single entry in the conversation log. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub sender: MessageSender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: MessageSender::User,
            timestamp: Utc::now(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: MessageSender::Bot,
            timestamp: Utc::now(),
        }
    }
}

/// Events produced by the controller's background tasks (network calls and
/// timers) and applied back on the UI loop.
///
/// Every variant carries the session `generation` it was spawned under so a
/// timer firing after a reset cannot mutate torn-down state.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// Greeting endpoint returned; replaces the log with the start screen.
    GreetingLoaded { text: String, generation: u64 },

    /// Category endpoint returned and the reply delay elapsed.
    FaqReady {
        category: Category,
        questions: Vec<String>,
        generation: u64,
    },

    /// Free-text endpoint returned and the reply delay elapsed.
    BotReply { text: String, generation: u64 },

    /// "inicio"/"volver" delay elapsed; re-fetch the greeting.
    HomeRequested { generation: u64 },

    /// A backend call failed. Already logged; just stop the indicator.
    RequestFailed { generation: u64 },

    /// Typing animation tick; advances the dots by one step.
    TypingTick { generation: u64 },
}

impl ChatEvent {
    pub fn generation(&self) -> u64 {
        match self {
            ChatEvent::GreetingLoaded { generation, .. }
            | ChatEvent::FaqReady { generation, .. }
            | ChatEvent::BotReply { generation, .. }
            | ChatEvent::HomeRequested { generation }
            | ChatEvent::RequestFailed { generation }
            | ChatEvent::TypingTick { generation } => *generation,
        }
    }
}
