pub mod health;

use axum::{routing::get, Router};

use crate::chat::handler::handle_chat;
use crate::state::AppState;

/// The chat handler answers every path, as behind an API Gateway proxy.
pub fn build_router(state: AppState) -> Router {
    Router::new().fallback(handle_chat).with_state(state)
}

/// Local dev server: the chat router plus `GET /health`.
pub fn build_local_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .fallback(handle_chat)
        .with_state(state)
}
