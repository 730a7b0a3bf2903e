use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::StatusCode,
    response::Response,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::AppState;

use super::{json_response, AppError};

// ─── Domain types ────────────────────────────────────────────────

/// Swipe payload. Any JSON object is accepted; the fields are never inspected.
#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SwipeResponse {
    pub message: String,
}

impl SwipeResponse {
    pub fn for_direction(direction: &str) -> Self {
        Self {
            message: format!("you swiped {direction}"),
        }
    }
}

// ─── POST /swipe/:direction/ ─────────────────────────────────────

pub async fn swipe(
    State(state): State<Arc<AppState>>,
    Path(direction): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    let body = body.map_err(|_| bad_request())?;
    let _request: SwipeRequest = serde_json::from_slice(&body).map_err(|_| bad_request())?;

    // left and right are handled identically for now
    match direction.as_str() {
        "left" | "right" => {
            state.counter.increment();
            tracing::debug!(direction = %direction, pending = state.counter.current(), "swipe counted");
            json_response(StatusCode::CREATED, &SwipeResponse::for_direction(&direction))
        }
        _ => Err(AppError::BadRequest("not left or right".into())),
    }
}

fn bad_request() -> AppError {
    AppError::BadRequest("bad request".into())
}
