//! Message store trait definition.
//!
//! Defines the storage interface for the conversation history. The
//! infrastructure layer (parley-infra) implements this trait twice: a flat
//! JSON file and a SQLite table. Both honour the same contract.

use parley_types::error::RepositoryError;
use parley_types::message::Message;

/// Durable, ordered, append-only message history.
///
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
/// Wrap an implementation in [`super::box_store::BoxMessageStore`] to pick a
/// backend at runtime.
pub trait MessageStore: Send + Sync {
    /// Short backend name for logs (e.g. "json_file", "sqlite").
    fn backend(&self) -> &str;

    /// Persist one message.
    ///
    /// Returns `Conflict` if a message with the same id already exists. On any
    /// error the caller must assume the message was not stored.
    fn append(
        &self,
        message: &Message,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Load every stored message, oldest first.
    ///
    /// An empty medium yields an empty list. Read failures are reported; the
    /// decision to degrade them to an empty history belongs to the caller.
    fn load_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;
}
