pub mod counter;
pub mod reporter;

pub use counter::ThroughputCounter;
pub use reporter::MetricsReporter;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// One throughput point shipped to the ingest endpoint per tick.
/// Sent as a single-element JSON array.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsRecord {
    /// Wall-clock time of the drain (RFC 3339, sub-second precision)
    pub time: DateTime<Utc>,
    /// Successful swipes since the previous tick
    pub throughput: u64,
}

impl MetricsRecord {
    pub fn now(throughput: u64) -> Self {
        Self {
            time: Utc::now(),
            throughput,
        }
    }
}

/// Why a single send to the ingest endpoint failed.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("encoding payload: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("ingest endpoint returned {0}")]
    Status(reqwest::StatusCode),
}
