pub mod health;
pub mod swipe;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

// ─── Unified error type ──────────────────────────────────────────

/// Per-request failure. Never affects shared state; rendered as a short
/// plain-text body and logged by the request-log middleware.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error text stashed in response extensions so the logging layer can
/// report it alongside the method and status code.
#[derive(Debug, Clone)]
pub struct ErrorMessage(pub String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        let mut response = (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            message.clone(),
        )
            .into_response();
        response.extensions_mut().insert(ErrorMessage(message));
        response
    }
}

// ─── Response helpers ────────────────────────────────────────────

/// Serialize `data` and build a JSON response with an explicit `Content-Length`.
pub fn json_response<T: Serialize>(status: StatusCode, data: &T) -> Result<Response, AppError> {
    let body = serde_json::to_vec(data)
        .map_err(|_| AppError::Internal("error marshaling JSON response".into()))?;
    tracing::debug!(send = %String::from_utf8_lossy(&body), "json response");

    let len = HeaderValue::from(body.len());
    Ok((
        status,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/json")),
            (header::CONTENT_LENGTH, len),
        ],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::{Error as _, Serializer};

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("nope"))
        }
    }

    #[test]
    fn json_response_sets_length_and_type() {
        let resp = json_response(StatusCode::CREATED, &serde_json::json!({"a": 1})).unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(resp.headers()[header::CONTENT_LENGTH], r#"{"a":1}"#.len().to_string());
    }

    #[test]
    fn serialization_failure_maps_to_500() {
        let err = json_response(StatusCode::OK, &Unserializable).unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_response_carries_message_extension() {
        let resp = AppError::BadRequest("not left or right".into()).into_response();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let msg = resp.extensions().get::<ErrorMessage>().unwrap();
        assert_eq!(msg.0, "not left or right");
    }
}
