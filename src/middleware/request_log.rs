use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::handlers::ErrorMessage;

/// Logs every request at debug level, and every handler error at error
/// level with the method, numeric status code and error message.
pub async fn request_log(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let start = Instant::now();
    let response = next.run(req).await;
    let us = start.elapsed().as_micros() as u64;

    let code = response.status().as_u16();
    match response.extensions().get::<ErrorMessage>() {
        Some(ErrorMessage(message)) => {
            tracing::error!(method = %method, code, path = %path, "{message}");
        }
        None => tracing::debug!(method = %method, code, path = %path, us, "request"),
    }

    response
}
