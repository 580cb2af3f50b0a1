use crate::model::{Role, Turn};

/// Opening message shown to the user; it is never sent back to the model.
pub const GREETING: &str = "Hello! I'm your SpendSmart AI assistant. I can help you analyze your spending, check your budgets, or find specific transactions. How can I help you today?";

pub type ChatMessage = Turn;

/// A running conversation with the assistant.
#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            messages: vec![Turn::model(GREETING)],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Prior turns to send as context: everything after the greeting.
    pub fn history(&self) -> &[ChatMessage] {
        match self.messages.first() {
            Some(first) if first.role == Role::Model && first.text == GREETING => {
                &self.messages[1..]
            }
            _ => &self.messages,
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
