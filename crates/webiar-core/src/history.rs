//! Append-only chat history for a single session.
//!
//! The history is an ordered sequence of user and assistant messages.
//! Entries are only ever appended; nothing mutates or removes an entry
//! once it is in. The whole structure is dropped with the session.

use serde::{Deserialize, Serialize};

/// The assistant greeting a fresh session starts with.
pub const GREETING: &str = "Hello! I'm an LLM web modifier. I can help you modify web content \
     in real-time. Try giving me instructions like 'Make the title red and larger' or 'Add a \
     button in the top right corner'.";

/// Who authored a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human typing instructions.
    User,
    /// The remote web-modifier service.
    Assistant,
}

/// One entry in the chat history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message author.
    pub role: Role,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered, append-only chat history.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history seeded with the assistant greeting.
    #[must_use]
    pub fn with_greeting() -> Self {
        let mut history = Self::new();
        history.push_assistant(GREETING);
        history
    }

    /// Append a user message and return a clone of the stored entry.
    pub fn push_user(&mut self, content: impl Into<String>) -> ChatMessage {
        self.push(ChatMessage::user(content))
    }

    /// Append an assistant message and return a clone of the stored entry.
    pub fn push_assistant(&mut self, content: impl Into<String>) -> ChatMessage {
        self.push(ChatMessage::assistant(content))
    }

    fn push(&mut self, message: ChatMessage) -> ChatMessage {
        self.messages.push(message.clone());
        message
    }

    /// All messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The most recent message, if any.
    #[must_use]
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Number of messages in the history.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
