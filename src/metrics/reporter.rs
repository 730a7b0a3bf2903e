use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;
use tracing::{debug, error, info_span, Instrument};

use super::{MetricsRecord, ReportError, ThroughputCounter};
use crate::config::Config;

/// Upper bound on a single ingest call so a stuck collector can't park the loop.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Periodically drains the throughput counter and POSTs it to the ingest endpoint.
///
/// Best effort: a failed send is logged and the drained count is dropped.
/// Nothing is retried or buffered; the next tick starts from zero.
pub struct MetricsReporter {
    client: reqwest::Client,
    ingest_url: String,
    api_token: String,
    counter: Arc<ThroughputCounter>,
    interval: Duration,
}

impl MetricsReporter {
    pub fn new(config: &Config, counter: Arc<ThroughputCounter>) -> Result<Self, ReportError> {
        let client = reqwest::Client::builder().timeout(SEND_TIMEOUT).build()?;

        Ok(Self {
            client,
            ingest_url: config.ingest_url(),
            api_token: config.api_token.clone(),
            counter,
            interval: config.report_interval,
        })
    }

    /// One tick: drain the counter and send the value.
    /// Returns the drained count on success.
    pub async fn tick(&self) -> Result<u64, ReportError> {
        let throughput = self.counter.drain_and_reset();
        self.send(&MetricsRecord::now(throughput)).await?;
        Ok(throughput)
    }

    /// POST a single record (wrapped in a one-element array) to the ingest endpoint.
    pub async fn send(&self, record: &MetricsRecord) -> Result<(), ReportError> {
        let payload = serde_json::to_vec(std::slice::from_ref(record))?;

        let response = self
            .client
            .post(&self.ingest_url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_token))
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Status(status));
        }
        Ok(())
    }

    /// Move the reporter onto its own task. Runs until the runtime shuts down.
    pub fn spawn(self) -> JoinHandle<()> {
        let span = info_span!("reporter", url = %self.ingest_url);
        tokio::spawn(self.run().instrument(span))
    }

    async fn run(self) {
        // First send happens one full interval after start, not at boot
        let mut interval = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = IntervalStream::new(interval);

        while ticks.next().await.is_some() {
            match self.tick().await {
                Ok(throughput) => debug!(throughput, "metrics sent"),
                Err(e) => error!(error = %e, "unable to send metrics to Axiom"),
            }
        }
    }
}
