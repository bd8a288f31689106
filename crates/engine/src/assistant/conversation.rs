use crate::Message;

/// Append-only turn log for one chat session.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    history: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored turn, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// The trailing `limit` turns, used as model context.
    pub fn recent(&self, limit: usize) -> &[Message] {
        let start = self.history.len().saturating_sub(limit);
        &self.history[start..]
    }

    /// Record a completed exchange. Both turns land together so the log
    /// always alternates user/assistant.
    pub fn record_exchange(&mut self, user: Message, assistant: Message) {
        self.history.push(user);
        self.history.push(assistant);
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}
