use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{health_handler, message_handler, AppState};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/messages", post(message_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
