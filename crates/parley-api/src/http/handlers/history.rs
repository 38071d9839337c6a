//! GET /api/history - the full stored conversation.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use parley_types::message::Message;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<Message>,
}

/// GET /api/history - all messages, oldest first.
///
/// Always 200. An unreadable store yields an empty list.
pub async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let messages = state.chat_service.history().await;
    tracing::debug!(count = messages.len(), "History served");
    Json(HistoryResponse { messages })
}
