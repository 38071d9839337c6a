//! Configuration types for Parley.
//!
//! `AppConfig` represents the optional `config.toml` in the data directory
//! that tunes the completion call. All fields have defaults matching the
//! stock behaviour, so an absent or empty file changes nothing.

use serde::{Deserialize, Serialize};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Instruction prepended to every completion request.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant inside a chat app. Reply in a friendly and concise way.";

/// Number of prior messages sent alongside the current turn.
pub const DEFAULT_CONTEXT_WINDOW: usize = 6;

/// Top-level configuration loaded from `{data_dir}/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Completion model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum output tokens per reply.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// System instruction for every request.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// How many stored messages precede the current turn in the context.
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Override for the OpenAI-compatible API base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_context_window() -> usize {
    DEFAULT_CONTEXT_WINDOW
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            system_prompt: default_system_prompt(),
            context_window: default_context_window(),
            base_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_default_values() {
        let config = AppConfig::default();
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert!((config.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.context_window, 6);
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_app_config_deserialize_with_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_app_config_deserialize_partial() {
        let toml_str = r#"
model = "llama-3.1-8b-instant"
context_window = 10
base_url = "http://localhost:8080/v1"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert_eq!(config.context_window, 10);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/v1"));
    }
}
