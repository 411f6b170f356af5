use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::feed::aggregator::DEFAULT_SOURCE;

const DEFAULT_FEED_COMPANIES: &str = "airbnb,doordash,spotify";
const DEFAULT_BOARDS_API_URL: &str = "https://boards-api.greenhouse.io";

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub feed_url: String,
    pub feed_companies: String,
    pub feed_source: String,
    pub feed_timeout: Duration,
    pub feed_remote_enabled: bool,
    pub boards_api_url: String,
    /// File-backed state when set, in-memory otherwise.
    pub state_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let feed_timeout_secs = lookup("FEED_TIMEOUT_SECS")
            .unwrap_or_else(|| "5".to_string())
            .parse::<u64>()
            .context("FEED_TIMEOUT_SECS must be a whole number of seconds")?;

        let feed_remote_enabled = lookup("FEED_REMOTE_ENABLED")
            .unwrap_or_else(|| "true".to_string())
            .parse::<bool>()
            .context("FEED_REMOTE_ENABLED must be 'true' or 'false'")?;

        Ok(Config {
            port,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            feed_url: lookup("FEED_URL")
                .unwrap_or_else(|| format!("http://127.0.0.1:{port}/api/jobs")),
            feed_companies: lookup("FEED_COMPANIES")
                .unwrap_or_else(|| DEFAULT_FEED_COMPANIES.to_string()),
            feed_source: lookup("FEED_SOURCE").unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            feed_timeout: Duration::from_secs(feed_timeout_secs),
            feed_remote_enabled,
            boards_api_url: lookup("BOARDS_API_URL")
                .unwrap_or_else(|| DEFAULT_BOARDS_API_URL.to_string()),
            state_dir: lookup("STATE_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}
