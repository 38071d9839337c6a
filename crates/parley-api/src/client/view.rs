//! Client-side conversation state with optimistic sends.
//!
//! The user's message is shown immediately under a temporary id. When the
//! server answers, its list replaces the local one wholesale. When the
//! request fails, the optimistic message is rolled back and a banner is set.

use parley_types::message::Message;

pub const HISTORY_LOAD_FAILED: &str = "Failed to load chat history. Please check backend.";
pub const SEND_FAILED: &str = "Failed to send message. Please try again.";

/// Prefix marking messages that exist only on the client.
pub const TEMP_ID_PREFIX: &str = "temp-";

#[derive(Debug, Default)]
pub struct ConversationView {
    messages: Vec<Message>,
    pending_id: Option<String>,
    error: Option<String>,
}

impl ConversationView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_sending(&self) -> bool {
        self.pending_id.is_some()
    }

    /// Replace the list with history loaded from the server.
    pub fn load(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.error = None;
    }

    pub fn load_failed(&mut self) {
        self.error = Some(HISTORY_LOAD_FAILED.to_string());
    }

    /// Start sending `text`.
    ///
    /// Returns the trimmed text to submit, or `None` when the input is blank
    /// or another send is still in flight.
    pub fn begin_send(&mut self, text: &str) -> Option<String> {
        let text = text.trim();
        if text.is_empty() || self.is_sending() {
            return None;
        }

        let mut optimistic = Message::user(text);
        optimistic.id = format!("{TEMP_ID_PREFIX}{}", optimistic.id);
        self.pending_id = Some(optimistic.id.clone());
        self.messages.push(optimistic);
        Some(text.to_string())
    }

    /// Adopt the server's authoritative list.
    pub fn complete_send(&mut self, messages: Vec<Message>) {
        self.messages = messages;
        self.pending_id = None;
        self.error = None;
    }

    /// Roll back the optimistic message and show the send banner.
    pub fn fail_send(&mut self) {
        if let Some(id) = self.pending_id.take() {
            self.messages.retain(|m| m.id != id);
        }
        self.error = Some(SEND_FAILED.to_string());
    }
}
