use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::adapters::cache::DEFAULT_SESSION;
use crate::core::engine::{rng_for, BingoEngine};
use crate::domain::model::{CardLayout, GenerationRequest, Topic, TopicSummary};
use crate::utils::error::{BingoError, ErrorCategory};

pub type AppState = Arc<BingoEngine>;

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// [`BingoError`] rendered as a JSON error body with the matching status.
#[derive(Debug)]
pub struct ApiError(pub BingoError);

impl From<BingoError> for ApiError {
    fn from(error: BingoError) -> Self {
        Self(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(BingoError::InvalidRequest {
            message: rejection.body_text(),
        })
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = self.0;
        let status =
            StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = match error.category() {
            ErrorCategory::Upstream => error.to_string(),
            _ => error.user_friendly_message(),
        };

        let body = match &error {
            BingoError::InsufficientItems { items, .. } => json!({
                "error": message,
                "suggestion": error.recovery_suggestion(),
                "items": items,
            }),
            _ => json!({
                "error": message,
                "suggestion": error.recovery_suggestion(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GenerateItemsRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub session: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<String>,
}

fn default_count() -> usize {
    1
}

#[derive(Debug, Deserialize)]
pub struct CardsRequest {
    pub topic: String,
    #[serde(default)]
    pub custom: bool,
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub session: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CardsResponse {
    pub topic: String,
    pub cards: Vec<CardLayout>,
    /// Full pool, for the cut-out calling list.
    pub items: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

fn session_or_default(session: Option<&str>) -> &str {
    session
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SESSION)
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// GET /api/topics
// ---------------------------------------------------------------------------

pub async fn list_topics(State(engine): State<AppState>) -> Json<Vec<TopicSummary>> {
    Json(engine.topics())
}

// ---------------------------------------------------------------------------
// POST /api/generate-bingo-items
// ---------------------------------------------------------------------------

pub async fn generate_items(
    State(engine): State<AppState>,
    payload: Result<Json<GenerateItemsRequest>, JsonRejection>,
) -> Result<Json<ItemsResponse>, ApiError> {
    let Json(request) = payload?;

    let topic = request
        .topic
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| BingoError::InvalidRequest {
            message: "Topic is required".to_string(),
        })?;

    let session = session_or_default(request.session.as_deref());
    let pool = engine.generate_items(session, topic).await?;

    Ok(Json(ItemsResponse {
        items: pool.into_items(),
    }))
}

// ---------------------------------------------------------------------------
// POST /api/cards
// ---------------------------------------------------------------------------

pub async fn create_cards(
    State(engine): State<AppState>,
    payload: Result<Json<CardsRequest>, JsonRejection>,
) -> Result<Json<CardsResponse>, ApiError> {
    let Json(request) = payload?;

    let name = request.topic.trim().to_string();
    let topic = if request.custom {
        Topic::custom(name)
    } else {
        Topic::predefined(name)
    };
    let generation = GenerationRequest {
        topic,
        card_count: request.count,
        seed: request.seed,
    };

    let session = session_or_default(request.session.as_deref());
    let mut rng = rng_for(generation.seed);
    let (pool, cards) = engine
        .cards_from_session(session, &generation, &mut rng)
        .await?;

    Ok(Json(CardsResponse {
        topic: generation.topic.name,
        cards,
        items: pool.into_items(),
        generated_at: Utc::now(),
    }))
}
