//! SQLite message store implementation.
//!
//! Implements `MessageStore` from `parley-core` over the `messages` table.
//! Timestamps are stored as millisecond ISO-8601 text so rows read back
//! exactly as written.

use parley_core::repository::message::MessageStore;
use parley_types::error::RepositoryError;
use parley_types::message::{Message, Sender, format_timestamp, parse_timestamp};
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageStore`.
pub struct SqliteMessageStore {
    pool: DatabasePool,
}

impl SqliteMessageStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Internal row type
// ---------------------------------------------------------------------------

struct MessageRow {
    id: String,
    sender: String,
    text: String,
    timestamp: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            sender: row.try_get("sender")?,
            text: row.try_get("text")?,
            timestamp: row.try_get("timestamp")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        let sender = self
            .sender
            .parse::<Sender>()
            .map_err(RepositoryError::Query)?;
        let timestamp = parse_timestamp(&self.timestamp)
            .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))?;

        Ok(Message {
            id: self.id,
            sender,
            text: self.text,
            timestamp,
        })
    }
}

fn map_read_error(err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => RepositoryError::Connection,
        other => RepositoryError::Query(other.to_string()),
    }
}

fn map_write_error(err: sqlx::Error, id: &str) -> RepositoryError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return RepositoryError::Conflict(format!("message {id} already exists"));
        }
    }
    map_read_error(err)
}

// ---------------------------------------------------------------------------
// MessageStore impl
// ---------------------------------------------------------------------------

impl MessageStore for SqliteMessageStore {
    fn backend(&self) -> &str {
        "sqlite"
    }

    async fn append(&self, message: &Message) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO messages (id, sender, text, timestamp) VALUES (?, ?, ?, ?)")
            .bind(&message.id)
            .bind(message.sender.to_string())
            .bind(&message.text)
            .bind(format_timestamp(&message.timestamp))
            .execute(&self.pool.writer)
            .await
            .map_err(|e| map_write_error(e, &message.id))?;

        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Message>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, sender, text, timestamp FROM messages ORDER BY timestamp ASC, rowid ASC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_read_error)?;

        rows.iter()
            .map(|row| {
                MessageRow::from_row(row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_message()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> SqliteMessageStore {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        // Keep the tempdir alive for the test duration.
        std::mem::forget(dir);
        SqliteMessageStore::new(pool)
    }

    #[tokio::test]
    async fn test_empty_table_loads_empty() {
        let store = test_store().await;
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_and_load_roundtrip() {
        let store = test_store().await;
        let user = Message::user("hello");
        let ai = Message::ai("Hi! How can I help?");

        store.append(&user).await.unwrap();
        store.append(&ai).await.unwrap();

        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded, vec![user, ai]);
    }

    #[tokio::test]
    async fn test_same_timestamp_keeps_insertion_order() {
        let store = test_store().await;
        let first = Message::user("first");
        let mut second = Message::ai("second");
        second.timestamp = first.timestamp;

        store.append(&first).await.unwrap();
        store.append(&second).await.unwrap();

        let loaded = store.load_all().await.unwrap();
        assert_eq!(loaded[0].text, "first");
        assert_eq!(loaded[1].text, "second");
    }

    #[tokio::test]
    async fn test_duplicate_id_is_conflict() {
        let store = test_store().await;
        let msg = Message::user("once");
        store.append(&msg).await.unwrap();

        let err = store.append(&msg).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(store.load_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_text_rejected_by_schema() {
        let store = test_store().await;
        let msg = Message::user("");
        assert!(store.append(&msg).await.is_err());
    }

    #[tokio::test]
    async fn test_backend_name() {
        assert_eq!(test_store().await.backend(), "sqlite");
    }
}
