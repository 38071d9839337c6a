//! Prompt construction from stored history.
//!
//! The current user message is persisted before the context is built, so the
//! reloaded history normally ends with it. The builder locates the current
//! message by id, windows only what came before it, and appends the current
//! turn itself. The result is always:
//!
//! `[system] + (at most `window` prior turns) + [current user turn]`
//!
//! with the current turn present exactly once, regardless of whether the
//! reload saw it, missed it, or saw later writes from a concurrent request.

use parley_types::llm::Turn;
use parley_types::message::{Message, Sender};

/// Map a stored message to a completion turn.
pub fn to_turn(message: &Message) -> Turn {
    match message.sender {
        Sender::User => Turn::user(message.text.clone()),
        Sender::Ai => Turn::assistant(message.text.clone()),
    }
}

/// Build the turn list sent to the completion API.
pub fn build_context(
    system_prompt: &str,
    history: &[Message],
    current: &Message,
    window: usize,
) -> Vec<Turn> {
    let cutoff = history
        .iter()
        .position(|m| m.id == current.id)
        .unwrap_or(history.len());
    let prior = &history[..cutoff];
    let prior = &prior[prior.len().saturating_sub(window)..];

    let mut turns = Vec::with_capacity(prior.len() + 2);
    turns.push(Turn::system(system_prompt));
    turns.extend(prior.iter().map(to_turn));
    turns.push(to_turn(current));
    turns
}
