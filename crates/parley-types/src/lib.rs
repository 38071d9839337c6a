//! Shared domain types for Parley.
//!
//! This crate contains the types used across the Parley chat relay: stored
//! chat messages, LLM request/response shapes, configuration, and errors.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod message;
