//! OpenAI-compatible LLM provider implementation.
//!
//! Talks to any `/chat/completions` endpoint (Groq by default) with plain
//! `reqwest`. The API key is wrapped in [`secrecy::SecretString`] and is only
//! exposed when building the `Authorization` header.

pub mod types;

use std::time::Duration;

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};

use parley_core::llm::provider::LlmProvider;
use parley_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

use self::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

/// Groq's OpenAI-compatible endpoint.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Fixed per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Provider for any OpenAI-compatible chat-completions API.
///
/// Does NOT derive Debug so the key can never end up in a log line.
pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    provider_name: String,
}

impl OpenAiCompatibleProvider {
    /// Create a provider for `base_url` (without the `/chat/completions` suffix).
    pub fn new(
        provider_name: impl Into<String>,
        api_key: SecretString,
        base_url: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            provider_name: provider_name.into(),
        })
    }

    /// Create a Groq provider.
    pub fn groq(api_key: SecretString) -> Result<Self, LlmError> {
        Self::new("groq", api_key, GROQ_BASE_URL)
    }

    /// Override the base URL (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn to_wire_request(request: &CompletionRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|turn| ChatMessage {
                    role: turn.role.to_string(),
                    content: Some(turn.content.clone()),
                })
                .collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

/// Parse a `retry-after` header given in seconds.
fn retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()
        .map(|secs| (secs * 1000.0) as u64)
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = Self::to_wire_request(request);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_ms(response.headers());
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED => LlmError::AuthenticationFailed,
                StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited {
                    retry_after_ms: retry_after,
                },
                StatusCode::BAD_REQUEST => LlmError::InvalidRequest(error_body),
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let wire: ChatCompletionResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        let usage = wire.usage.clone().unwrap_or_default();
        Ok(CompletionResponse {
            content: wire.first_content(),
            finish_reason: wire.choices.first().and_then(|c| c.finish_reason.clone()),
            id: wire.id,
            model: if wire.model.is_empty() {
                request.model.clone()
            } else {
                wire.model
            },
            usage: Usage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::Router;
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::post;
    use parley_types::llm::Turn;
    use serde_json::{Value, json};

    /// Serve `router` on an ephemeral port and return its base URL.
    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "llama-3.3-70b-versatile".to_string(),
            messages: vec![Turn::system("be nice"), Turn::user("hello")],
            max_tokens: 1024,
            temperature: Some(0.7),
        }
    }

    fn provider(base_url: &str) -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::groq(SecretString::from("test-key".to_string()))
            .unwrap()
            .with_base_url(base_url)
    }

    #[test]
    fn test_groq_defaults() {
        let p = OpenAiCompatibleProvider::groq(SecretString::from("k".to_string())).unwrap();
        assert_eq!(p.name(), "groq");
        assert_eq!(p.base_url(), GROQ_BASE_URL);
        assert_eq!(p.with_base_url("http://x/v1/").base_url(), "http://x/v1");
    }

    #[test]
    fn test_wire_request_shape() {
        let wire = OpenAiCompatibleProvider::to_wire_request(&request());
        let value = serde_json::to_value(&wire).unwrap();
        assert_eq!(value["model"], "llama-3.3-70b-versatile");
        assert_eq!(value["max_tokens"], 1024);
        assert_eq!(value["temperature"], 0.7);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hello");
    }

    #[test]
    fn test_retry_after_parsing() {
        let mut headers = reqwest::header::HeaderMap::new();
        assert_eq!(retry_after_ms(&headers), None);
        headers.insert(reqwest::header::RETRY_AFTER, "2".parse().unwrap());
        assert_eq!(retry_after_ms(&headers), Some(2000));
    }

    #[tokio::test]
    async fn test_complete_against_stub() {
        let router = Router::new().route(
            "/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer test-key");
                let last = body["messages"][1]["content"].as_str().unwrap_or("").to_string();
                Json(json!({
                    "id": "chatcmpl-42",
                    "model": body["model"],
                    "choices": [{
                        "index": 0,
                        "message": {"role": "assistant", "content": format!("you said {last}")},
                        "finish_reason": "stop"
                    }],
                    "usage": {"prompt_tokens": 12, "completion_tokens": 4}
                }))
            }),
        );
        let base = spawn_stub(router).await;

        let resp = provider(&base).complete(&request()).await.unwrap();
        assert_eq!(resp.id, "chatcmpl-42");
        assert_eq!(resp.content.as_deref(), Some("you said hello"));
        assert_eq!(resp.finish_reason.as_deref(), Some("stop"));
        assert_eq!(resp.usage.input_tokens, 12);
        assert_eq!(resp.usage.output_tokens, 4);
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_auth_failed() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { (AxumStatus::UNAUTHORIZED, "bad key") }),
        );
        let base = spawn_stub(router).await;

        let err = provider(&base).complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::AuthenticationFailed));
    }

    #[tokio::test]
    async fn test_rate_limit_reads_retry_after() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { (AxumStatus::TOO_MANY_REQUESTS, [("retry-after", "3")], "slow down") }),
        );
        let base = spawn_stub(router).await;

        let err = provider(&base).complete(&request()).await.unwrap_err();
        assert!(matches!(
            err,
            LlmError::RateLimited {
                retry_after_ms: Some(3000)
            }
        ));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_provider() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "oops") }),
        );
        let base = spawn_stub(router).await;

        let err = provider(&base).complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Provider { ref message } if message.contains("oops")));
    }

    #[tokio::test]
    async fn test_garbage_body_maps_to_deserialization() {
        let router = Router::new().route("/chat/completions", post(|| async { "not json" }));
        let base = spawn_stub(router).await;

        let err = provider(&base).complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Deserialization(_)));
    }

    #[tokio::test]
    async fn test_empty_choices_yield_no_content() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { Json(json!({"id": "x", "model": "m", "choices": []})) }),
        );
        let base = spawn_stub(router).await;

        let resp = provider(&base).complete(&request()).await.unwrap();
        assert!(resp.content.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_provider_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = provider(&format!("http://{addr}"))
            .complete(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Provider { .. }));
    }
}
