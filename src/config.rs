//! Process configuration, read once from the environment at startup.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_INGEST_BASE_URL: &str = "https://api.axiom.co";
const REPORT_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("PORT must be a number between 0 and 65535, got {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Axiom dataset the throughput points are written to
    pub dataset: String,
    pub api_token: String,
    /// Scheme + host of the ingest API, without a trailing slash
    pub ingest_base_url: String,
    pub report_interval: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key → value source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let dataset = get("AXIOM_DATASET").ok_or(ConfigError::MissingVar("AXIOM_DATASET"))?;
        let api_token = get("AXIOM_API_TOKEN").ok_or(ConfigError::MissingVar("AXIOM_API_TOKEN"))?;

        let ingest_base_url = get("AXIOM_URL")
            .map(|url| url.trim_end_matches('/').to_owned())
            .unwrap_or_else(|| DEFAULT_INGEST_BASE_URL.to_owned());

        Ok(Self {
            port,
            dataset,
            api_token,
            ingest_base_url,
            report_interval: REPORT_INTERVAL,
        })
    }

    pub fn ingest_url(&self) -> String {
        format!("{}/v1/datasets/{}/ingest", self.ingest_base_url, self.dataset)
    }

    /// Addresses to try, in order: all interfaces over IPv6 (dual-stack on most
    /// hosts), then all IPv4 interfaces for hosts without IPv6.
    pub fn listen_addrs(&self) -> [SocketAddr; 2] {
        [
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, self.port)),
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port)),
        ]
    }
}
