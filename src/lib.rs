//! HTTP swipe service that reports request throughput to Axiom.
//!
//! Handlers bump a shared [`metrics::ThroughputCounter`]; a background
//! [`metrics::MetricsReporter`] drains it every few seconds and ships the
//! value to the ingest endpoint.

use std::sync::Arc;

pub mod config;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod server;

/// Shared application state available to every handler via `State<Arc<AppState>>`.
#[derive(Debug, Default)]
pub struct AppState {
    /// Successful swipes since the last drain. The reporter holds the other reference.
    pub counter: Arc<metrics::ThroughputCounter>,
}
