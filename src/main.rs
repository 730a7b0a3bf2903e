use std::process::ExitCode;
use std::time::Duration;

use swipe_server::{
    config::{Config, ConfigError},
    logging,
    metrics::ReportError,
    server::Server,
};
use thiserror::Error;

const DROPPED_LOG_CHECK: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
enum StartupError {
    #[error("you forgot to add the Axiom env variables: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to build metrics reporter: {0}")]
    Reporter(#[from] ReportError),
    #[error("failed to bind: {0}")]
    Bind(std::io::Error),
    #[error("server died: {0}")]
    Serve(std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    // Held until main returns so buffered log lines are flushed, even on failure
    let logs = logging::init_from_env();
    let _drop_reporter = logs.spawn_drop_reporter(DROPPED_LOG_CHECK);

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    // ── 1. Configuration (fatal before binding) ─────────────────
    let config = Config::from_env()?;

    // ── 2. Router + reporter ────────────────────────────────────
    let server = Server::new(&config)?;

    // ── 3. Bind & serve ─────────────────────────────────────────
    // Dual-stack first, plain IPv4 where IPv6 is unavailable
    let addrs = config.listen_addrs();
    let listener = tokio::net::TcpListener::bind(&addrs[..])
        .await
        .map_err(StartupError::Bind)?;

    tracing::info!(
        port = config.port,
        dataset = %config.dataset,
        "starting server on port {}",
        config.port
    );

    server.serve(listener).await.map_err(StartupError::Serve)
}
