//! POST /api/chat - send one message and get the assistant's reply.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;

use parley_types::message::ChatExchange;

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for POST /api/chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// POST /api/chat - store the message, ask the model, store the reply.
///
/// A missing, malformed or blank body is a 400 with the validation message,
/// the same as an empty `text`.
pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatExchange>, AppError> {
    let text = match payload {
        Ok(Json(request)) => request.text.unwrap_or_default(),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected chat request body");
            String::new()
        }
    };

    let exchange = state.chat_service.send(&text).await?;
    Ok(Json(exchange))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use serde_json::json;

    use parley_core::chat::completion::FALLBACK_REPLY;
    use parley_types::message::Sender;

    use crate::http::handlers::body_json;
    use crate::state::testing::{MemoryStore, ScriptedProvider, replying, state_with};

    fn body(text: Option<&str>) -> Result<Json<ChatRequest>, JsonRejection> {
        Ok(Json(ChatRequest {
            text: text.map(str::to_string),
        }))
    }

    #[tokio::test]
    async fn test_hello_returns_exchange() {
        let state = replying("Hi! How can I help?");
        let Json(exchange) = send_message(State(state.clone()), body(Some("hello")))
            .await
            .unwrap();

        assert_eq!(exchange.messages.len(), 2);
        assert_eq!(exchange.messages[0].sender, Sender::User);
        assert_eq!(exchange.messages[0].text, "hello");
        assert_eq!(exchange.reply.sender, Sender::Ai);
        assert_eq!(exchange.reply.text, "Hi! How can I help?");
        assert_eq!(state.chat_service.history().await.len(), 2);
    }

    #[tokio::test]
    async fn test_response_shape() {
        let state = replying("pong");
        let response = send_message(State(state), body(Some("ping")))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let value = body_json(response).await;
        assert_eq!(value["messages"].as_array().unwrap().len(), 2);
        assert_eq!(value["reply"]["sender"], "ai");
        assert_eq!(value["reply"]["text"], "pong");
        assert!(value["reply"]["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_blank_or_missing_text_is_400() {
        for text in [None, Some(""), Some("   ")] {
            let state = replying("unused");
            let response = send_message(State(state.clone()), body(text))
                .await
                .into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                body_json(response).await,
                json!({"error": "Message text is required"})
            );
            assert!(state.chat_service.history().await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_completion_failure_returns_fallback() {
        let state = state_with(
            MemoryStore::default(),
            ScriptedProvider {
                reply: None,
                fail: true,
            },
        );
        let Json(exchange) = send_message(State(state), body(Some("hello")))
            .await
            .unwrap();
        assert_eq!(exchange.reply.text, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_store_failure_is_generic_500() {
        let state = state_with(
            MemoryStore {
                fail_writes: true,
                ..Default::default()
            },
            ScriptedProvider {
                reply: Some("unused".to_string()),
                fail: false,
            },
        );
        let response = send_message(State(state), body(Some("hello")))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Failed to get AI response"})
        );
    }
}
