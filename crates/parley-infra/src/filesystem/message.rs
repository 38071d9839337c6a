//! JSON-file message store.
//!
//! The whole conversation lives in one pretty-printed JSON array. Every
//! append is a read-modify-write of that file, serialized in-process by an
//! async mutex and committed by renaming a sibling temp file into place.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parley_core::repository::message::MessageStore;
use parley_types::error::RepositoryError;
use parley_types::message::Message;
use tokio::sync::Mutex;
use tracing::debug;

/// `MessageStore` backed by a single JSON array file.
pub struct JsonFileMessageStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileMessageStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_messages(&self) -> Result<Vec<Message>, RepositoryError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(RepositoryError::Io(format!(
                    "failed to read {}: {err}",
                    self.path.display()
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            RepositoryError::Query(format!("malformed history file {}: {e}", self.path.display()))
        })
    }

    async fn write_messages(&self, messages: &[Message]) -> Result<(), RepositoryError> {
        let io_err = |e: std::io::Error| {
            RepositoryError::Io(format!("failed to write {}: {e}", self.path.display()))
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        // serde_json's pretty printer indents with two spaces.
        let json = serde_json::to_string_pretty(messages)
            .map_err(|e| RepositoryError::Query(format!("failed to encode history: {e}")))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(io_err)?;
        Ok(())
    }
}

impl MessageStore for JsonFileMessageStore {
    fn backend(&self) -> &str {
        "json_file"
    }

    async fn append(&self, message: &Message) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;

        let mut messages = self.read_messages().await?;
        if messages.iter().any(|m| m.id == message.id) {
            return Err(RepositoryError::Conflict(format!(
                "message {} already exists",
                message.id
            )));
        }
        messages.push(message.clone());
        self.write_messages(&messages).await?;

        debug!(
            path = %self.path.display(),
            count = messages.len(),
            "History file updated"
        );
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<Message>, RepositoryError> {
        self.read_messages().await
    }
}
