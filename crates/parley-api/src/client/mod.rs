//! HTTP client for a running Parley server, used by `parley chat`.

pub mod view;

use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
use serde_json::json;

use parley_types::message::{ChatExchange, Message};

/// Default server address for the terminal client.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Deserialize)]
struct HistoryBody {
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Thin wrapper over the two chat endpoints.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("failed to create HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /api/history
    pub async fn history(&self) -> anyhow::Result<Vec<Message>> {
        let resp = self
            .http
            .get(format!("{}/api/history", self.base_url))
            .send()
            .await
            .context("history request failed")?;
        let body: HistoryBody = Self::check(resp).await?.json().await?;
        Ok(body.messages)
    }

    /// POST /api/chat
    pub async fn send(&self, text: &str) -> anyhow::Result<ChatExchange> {
        let resp = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&json!({ "text": text }))
            .send()
            .await
            .context("chat request failed")?;
        Ok(Self::check(resp).await?.json().await?)
    }

    async fn check(resp: reqwest::Response) -> anyhow::Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp
            .json::<ErrorBody>()
            .await
            .map(|b| b.error)
            .unwrap_or_else(|_| status.to_string());
        anyhow::bail!("server returned {status}: {message}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::http::router::build_router;
    use crate::state::testing::replying;

    async fn spawn_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = build_router(replying("Hi there"), None);
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/")
    }

    #[tokio::test]
    async fn test_send_and_history() {
        let client = ApiClient::new(&spawn_server().await).unwrap();
        assert!(!client.base_url().ends_with('/'));

        assert!(client.history().await.unwrap().is_empty());

        let exchange = client.send("hello").await.unwrap();
        assert_eq!(exchange.reply.text, "Hi there");

        let history = client.history().await.unwrap();
        assert_eq!(history, exchange.messages);
    }

    #[tokio::test]
    async fn test_server_error_message_is_surfaced() {
        let client = ApiClient::new(&spawn_server().await).unwrap();
        let err = client.send("   ").await.unwrap_err();
        assert!(err.to_string().contains("Message text is required"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(&format!("http://{addr}")).unwrap();
        assert!(client.history().await.is_err());
    }
}
