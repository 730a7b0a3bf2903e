use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
};

// ─── GET /health ─────────────────────────────────────────────────

pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain")],
        "Hello world!",
    )
}
