//! Append-only transcript for one chat session.

use crate::types::{ChatMessage, Role};

/// Ordered, append-only list of chat messages.
///
/// Entries are never removed or edited; a conversation lives until the page
/// is reloaded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a conversation with an assistant greeting already in place.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut conversation = Self::new();
        conversation.append(ChatMessage::assistant(greeting));
        conversation
    }

    /// Add a message to the tail.
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// The full transcript in send order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn count_role(&self, role: Role) -> usize {
        self.messages.iter().filter(|msg| msg.role == role).count()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
