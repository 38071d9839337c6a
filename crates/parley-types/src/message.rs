//! Chat message domain types for Parley.
//!
//! A `Message` is one entry in the single, append-only conversation: either
//! something the user typed or the reply the assistant produced. Messages are
//! created once and never mutated or deleted.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Who authored a message.
///
/// Serialized as `"user"` / `"ai"` on the wire and in storage. Maps to the
/// CHECK constraint in the SQLite schema: `CHECK (sender IN ('user', 'ai'))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Ai => write!(f, "ai"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "ai" => Ok(Sender::Ai),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// A single stored chat message.
///
/// `id` is a plain string so histories written by older clients (which used
/// timestamp-suffixed ids) still load. New ids are UUIDv7.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    /// Always written back in UTC `…mmmZ` form. A stored value with an
    /// offset or other precision is normalized on the next file rewrite.
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new message stamped with a fresh UUIDv7 and the current time.
    ///
    /// The timestamp is truncated to milliseconds, the precision it is stored
    /// with, so a message reads back exactly as it was written.
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            sender,
            text: text.into(),
            timestamp: Utc::now().trunc_subsecs(3),
        }
    }

    /// Create a user-authored message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// Create an assistant-authored message.
    pub fn ai(text: impl Into<String>) -> Self {
        Self::new(Sender::Ai, text)
    }
}

/// Outcome of one chat request: the updated conversation and the new reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatExchange {
    pub messages: Vec<Message>,
    pub reply: Message,
}

/// Format a timestamp as ISO-8601 with millisecond precision and a `Z` suffix
/// (e.g. `2026-01-05T09:14:03.120Z`).
pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 / ISO-8601 timestamp into UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
