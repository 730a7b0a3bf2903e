use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_mw,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::handlers;
use crate::metrics::{MetricsReporter, ReportError, ThroughputCounter};
use crate::middleware::request_log;
use crate::AppState;

/// Builds the Axum `Router` with both routes and the logging layers.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        // Bodies are read whole, whatever their size
        .route(
            "/swipe/:direction/",
            post(handlers::swipe::swipe).layer(DefaultBodyLimit::disable()),
        )
        .with_state(state)
        // ── Global middleware (applied bottom-up) ───────────────
        .layer(axum_mw::from_fn(request_log::request_log))
        .layer(TraceLayer::new_for_http())
}

/// The HTTP router and the metrics reporter, held side by side.
///
/// They never call each other; both hold the same `ThroughputCounter`.
pub struct Server {
    router: Router,
    reporter: MetricsReporter,
}

impl Server {
    pub fn new(config: &Config) -> Result<Self, ReportError> {
        let counter = Arc::new(ThroughputCounter::new());
        let reporter = MetricsReporter::new(config, counter.clone())?;
        let router = create_router(Arc::new(AppState { counter }));

        Ok(Self { router, reporter })
    }

    /// Start the reporter task, then serve until the process exits.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let _reporter = self.reporter.spawn();
        axum::serve(listener, self.router).await
    }
}
