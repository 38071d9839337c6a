//! Completion client: one provider call with fixed sampling settings.

use std::time::Instant;

use parley_types::config::AppConfig;
use parley_types::llm::{CompletionRequest, LlmError, Turn};
use tracing::{debug, warn};

use crate::llm::box_provider::BoxLlmProvider;

/// Reply stored when the provider produces no usable text.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't generate a response.";

/// Model and sampling parameters applied to every request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSettings {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for CompletionSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// Thin wrapper over a provider that returns reply text.
pub struct CompletionClient {
    provider: BoxLlmProvider,
    settings: CompletionSettings,
}

impl CompletionClient {
    pub fn new(provider: BoxLlmProvider, settings: CompletionSettings) -> Self {
        Self { provider, settings }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Request a completion for `turns` and return the trimmed reply text.
    ///
    /// Provider failures propagate. A response without content (or with only
    /// whitespace) yields [`FALLBACK_REPLY`] instead of an error.
    pub async fn complete(&self, turns: &[Turn]) -> Result<String, LlmError> {
        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: turns.to_vec(),
            max_tokens: self.settings.max_tokens,
            temperature: Some(self.settings.temperature),
        };

        let started = Instant::now();
        let response = self.provider.complete(&request).await?;
        debug!(
            provider = self.provider.name(),
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Completion received"
        );

        match response.content.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Ok(text.to_string()),
            _ => {
                warn!(
                    provider = self.provider.name(),
                    response_id = %response.id,
                    "Completion had no content, using fallback reply"
                );
                Ok(FALLBACK_REPLY.to_string())
            }
        }
    }
}
