//! Application state wiring the chat service together.
//!
//! AppState holds the one `ChatService` shared by every HTTP handler. The
//! service is pinned to `BoxMessageStore` so the storage backend (JSON file
//! or SQLite) is picked at startup from configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use secrecy::SecretString;

use parley_core::chat::completion::{CompletionClient, CompletionSettings};
use parley_core::chat::service::ChatService;
use parley_core::repository::box_store::BoxMessageStore;
use parley_core::repository::message::MessageStore;
use parley_infra::config::{LLM_BASE_URL_ENV, load_app_config, with_base_url_override};
use parley_infra::filesystem::message::JsonFileMessageStore;
use parley_infra::filesystem::{default_history_path, resolve_data_dir};
use parley_infra::llm::create_provider;
use parley_infra::sqlite::message::SqliteMessageStore;
use parley_infra::sqlite::pool::DatabasePool;
use parley_types::error::ConfigError;

/// Environment variable holding the completion API key.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

pub type ConcreteChatService = ChatService<BoxMessageStore>;

/// Shared application state for the REST API.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
}

/// Where messages are persisted.
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    /// SQLite URL. When set, the SQLite backend is used.
    pub database_url: Option<String>,
    /// JSON history file. Defaults to `{data_dir}/messages.json`.
    pub history_file: Option<PathBuf>,
}

impl AppState {
    pub fn new(chat_service: ConcreteChatService) -> Self {
        Self {
            chat_service: Arc::new(chat_service),
        }
    }

    /// Build the state for `serve`: config, API key, store, provider.
    pub async fn init(options: &StoreOptions) -> anyhow::Result<Self> {
        let api_key = read_api_key(std::env::var(API_KEY_ENV).ok())?;

        let data_dir = resolve_data_dir();
        let config = load_app_config(&data_dir).await;
        let config = with_base_url_override(config, std::env::var(LLM_BASE_URL_ENV).ok());

        let store = open_store(options, &data_dir).await?;
        let provider = create_provider(&config, api_key).context("failed to create LLM provider")?;

        tracing::info!(
            backend = store.backend(),
            provider = provider.name(),
            model = %config.model,
            context_window = config.context_window,
            "Chat service ready"
        );

        let completion = CompletionClient::new(provider, CompletionSettings::from(&config));
        Ok(Self::new(ChatService::new(
            store,
            completion,
            config.system_prompt,
            config.context_window,
        )))
    }
}

/// Validate the API key value. Blank counts as missing.
pub fn read_api_key(value: Option<String>) -> Result<SecretString, ConfigError> {
    match value {
        Some(key) if !key.trim().is_empty() => Ok(SecretString::from(key.trim().to_string())),
        _ => Err(ConfigError::MissingApiKey(API_KEY_ENV)),
    }
}

/// Open the configured message store.
///
/// SQLite when a database URL is given, otherwise the JSON history file.
pub async fn open_store(options: &StoreOptions, data_dir: &Path) -> anyhow::Result<BoxMessageStore> {
    if let Some(url) = options.database_url.as_deref().filter(|u| !u.trim().is_empty()) {
        if !url.starts_with("sqlite:") {
            return Err(ConfigError::Invalid(format!(
                "unsupported database URL '{url}', expected sqlite://..."
            ))
            .into());
        }
        let pool = DatabasePool::new(url)
            .await
            .with_context(|| format!("failed to open database {url}"))?;
        return Ok(BoxMessageStore::new(SqliteMessageStore::new(pool)));
    }

    let path = options
        .history_file
        .clone()
        .unwrap_or_else(|| default_history_path(data_dir));
    let store = JsonFileMessageStore::new(path);
    tracing::debug!(path = %store.path().display(), "Using JSON history file");
    Ok(BoxMessageStore::new(store))
}
