//! Chat orchestration for Parley.
//!
//! `context` turns stored history into a bounded prompt, `completion` wraps
//! the provider call with fixed sampling settings, and `service` runs the
//! full store -> context -> complete -> store exchange.

pub mod completion;
pub mod context;
pub mod service;
