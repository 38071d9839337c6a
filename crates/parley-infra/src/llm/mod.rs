//! LLM provider implementations.
//!
//! Concrete [`LlmProvider`](parley_core::llm::provider::LlmProvider)
//! implementations plus [`create_provider`], which builds the boxed provider
//! the chat service runs on.

pub mod openai_compat;

use secrecy::SecretString;

use parley_core::llm::box_provider::BoxLlmProvider;
use parley_types::config::AppConfig;
use parley_types::llm::LlmError;

use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] for the configured endpoint.
///
/// Uses Groq unless `config.base_url` points elsewhere.
pub fn create_provider(config: &AppConfig, api_key: SecretString) -> Result<BoxLlmProvider, LlmError> {
    let provider = OpenAiCompatibleProvider::groq(api_key)?;
    let provider = match config.base_url.as_deref() {
        Some(base_url) => provider.with_base_url(base_url),
        None => provider,
    };
    tracing::debug!(
        provider = "groq",
        base_url = provider.base_url(),
        model = %config.model,
        "LLM provider created"
    );
    Ok(BoxLlmProvider::new(provider))
}
