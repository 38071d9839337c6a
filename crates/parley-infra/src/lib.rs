//! Infrastructure layer for Parley.
//!
//! Contains implementations of the port traits defined in `parley-core`:
//! the JSON-file and SQLite message stores, and the OpenAI-compatible HTTP
//! completion provider. Also loads `config.toml` and resolves the data dir.

pub mod config;
pub mod filesystem;
pub mod llm;
pub mod sqlite;
