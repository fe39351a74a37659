use axum::{
    routing::{get, post},
    Router,
};

use super::handler::{create_cards, generate_items, health, list_topics, AppState};

pub fn router(engine: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/topics", get(list_topics))
        .route("/api/generate-bingo-items", post(generate_items))
        .route("/api/cards", post(create_cards))
        .with_state(engine)
}
