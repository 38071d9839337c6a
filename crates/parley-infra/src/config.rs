//! Configuration loader for Parley.
//!
//! Reads `config.toml` from the data directory and deserializes it into
//! [`AppConfig`]. Falls back to defaults when the file is missing or
//! malformed.

use std::path::Path;

use parley_types::config::AppConfig;

/// Environment variable overriding the completion API base URL.
pub const LLM_BASE_URL_ENV: &str = "PARLEY_LLM_BASE_URL";

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: [`AppConfig::default()`].
/// - Unreadable or unparsable file: warning, then the default.
pub async fn load_app_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

/// Apply a base URL override (normally from `PARLEY_LLM_BASE_URL`).
///
/// Blank values are ignored.
pub fn with_base_url_override(mut config: AppConfig, base_url: Option<String>) -> AppConfig {
    if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
        config.base_url = Some(url.trim().to_string());
    }
    config
}
