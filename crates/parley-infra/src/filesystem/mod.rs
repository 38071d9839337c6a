//! Filesystem adapters for Parley.
//!
//! Resolves the data directory and hosts the JSON-file message store.

pub mod message;

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "PARLEY_DATA_DIR";

/// Resolve the data directory.
///
/// `PARLEY_DATA_DIR` wins, then `~/.parley`, then `./.parley` when no home
/// directory can be determined.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(".parley"))
        .unwrap_or_else(|| PathBuf::from(".parley"))
}

/// Default location of the JSON history file: `{data_dir}/messages.json`.
pub fn default_history_path(data_dir: &Path) -> PathBuf {
    data_dir.join("messages.json")
}
