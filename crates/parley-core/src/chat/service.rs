//! Chat service orchestrating message persistence and completion.
//!
//! ChatService coordinates the MessageStore and the CompletionClient for the
//! single conversation: validate, store the user message, rebuild context,
//! ask the model, store the reply.

use parley_types::error::ChatError;
use parley_types::message::{ChatExchange, Message};
use tracing::{debug, error, info, warn};

use crate::chat::completion::{CompletionClient, FALLBACK_REPLY};
use crate::chat::context::build_context;
use crate::repository::message::MessageStore;

/// Validation message for blank or missing input.
pub const TEXT_REQUIRED: &str = "Message text is required";

/// Orchestrates one conversation over a message store and a completion client.
///
/// Generic over `MessageStore` to keep parley-core free of storage crates.
pub struct ChatService<S: MessageStore> {
    store: S,
    completion: CompletionClient,
    system_prompt: String,
    context_window: usize,
}

impl<S: MessageStore> ChatService<S> {
    /// Create a new chat service.
    pub fn new(
        store: S,
        completion: CompletionClient,
        system_prompt: String,
        context_window: usize,
    ) -> Self {
        Self {
            store,
            completion,
            system_prompt,
            context_window,
        }
    }

    /// Load the full conversation, oldest first.
    ///
    /// Never fails: a store read error is logged and yields an empty history.
    pub async fn history(&self) -> Vec<Message> {
        match self.store.load_all().await {
            Ok(messages) => messages,
            Err(err) => {
                warn!(
                    backend = self.store.backend(),
                    error = %err,
                    "Failed to read history, returning empty"
                );
                Vec::new()
            }
        }
    }

    /// Run one chat exchange for `text`.
    ///
    /// Blank input is rejected before anything is stored. A failed completion
    /// is logged and answered with [`FALLBACK_REPLY`] so every stored user
    /// message gets a paired reply. Store write failures are returned.
    pub async fn send(&self, text: &str) -> Result<ChatExchange, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::Validation(TEXT_REQUIRED.to_string()));
        }

        let user_message = Message::user(text);
        self.store.append(&user_message).await?;
        debug!(
            message_id = %user_message.id,
            backend = self.store.backend(),
            "User message stored"
        );

        let mut messages = self.history().await;
        let turns = build_context(
            &self.system_prompt,
            &messages,
            &user_message,
            self.context_window,
        );

        let reply_text = match self.completion.complete(&turns).await {
            Ok(text) => text,
            Err(err) => {
                error!(
                    provider = self.completion.provider_name(),
                    error = %err,
                    "Completion failed, storing fallback reply"
                );
                FALLBACK_REPLY.to_string()
            }
        };

        let reply = Message::ai(reply_text);
        self.store.append(&reply).await?;

        if !messages.iter().any(|m| m.id == user_message.id) {
            messages.push(user_message);
        }
        messages.push(reply.clone());

        info!(
            reply_id = %reply.id,
            context_turns = turns.len(),
            history_len = messages.len(),
            "Chat exchange complete"
        );

        Ok(ChatExchange { messages, reply })
    }
}
