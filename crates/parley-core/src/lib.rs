//! Business logic and port trait definitions for Parley.
//!
//! This crate defines the "ports" (store and LLM provider traits) that the
//! infrastructure layer implements, plus the chat orchestration built on top
//! of them. It depends only on `parley-types` -- never on `parley-infra` or
//! any database/IO crate.

pub mod chat;
pub mod llm;
pub mod repository;
