use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::debug;

use super::gate::{ChannelGate, ChatMessage};
use crate::application::Dispatcher;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub gate: Arc<ChannelGate>,
    pub ingress_token: Arc<str>,
}

impl AppState {
    fn is_authorized(&self, headers: &HeaderMap) -> bool {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .is_some_and(|token| tokens_match(token.as_bytes(), self.ingress_token.as_bytes()))
    }
}

/// Byte comparison whose running time depends only on the lengths.
fn tokens_match(given: &[u8], expected: &[u8]) -> bool {
    given.len() == expected.len()
        && given
            .iter()
            .zip(expected)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// Response for /api/messages
#[derive(Debug, Serialize)]
pub struct MessageReply {
    pub reply: String,
    pub timestamp: String,
}

/// Handler for GET /api/health
pub async fn health_handler() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "service": "podwarden"
        })),
    )
}

/// Handler for POST /api/messages
pub async fn message_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // The body is only parsed once the caller is authorized.
    if !state.is_authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let message: ChatMessage = match serde_json::from_slice(&body) {
        Ok(message) => message,
        Err(e) => {
            debug!(error = %e, "Rejected malformed message body");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let Some(text) = state.gate.admit(&message) else {
        debug!(
            guild = message.guild_id,
            channel = message.channel_id,
            "Dropped message outside the authorization boundary"
        );
        return StatusCode::NO_CONTENT.into_response();
    };

    let reply = state.dispatcher.dispatch(&text).await;

    (
        StatusCode::OK,
        Json(MessageReply {
            reply: reply.render(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }),
    )
        .into_response()
}
