// src/config.rs
//! Client configuration. Everything comes from the environment with local
//! defaults; components receive the resolved values explicitly.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const CLIENT_HOME_DIR: &str = ".cvmatch";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub timeout_seconds: u64,
    pub credentials_dir: PathBuf,
}

impl ClientConfig {
    pub fn load() -> Result<Self> {
        let api_base_url = std::env::var("CVMATCH_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_seconds = match std::env::var("CVMATCH_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .context("CVMATCH_TIMEOUT_SECS must be a number of seconds")?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        let credentials_dir = Self::resolve_home()?;

        info!("API base URL: {}", api_base_url);
        Ok(Self {
            api_base_url,
            timeout_seconds,
            credentials_dir,
        })
    }

    /// Where tokens live. `CVMATCH_HOME` overrides the default
    /// `~/.cvmatch` so tests and parallel setups stay isolated.
    fn resolve_home() -> Result<PathBuf> {
        if let Ok(home) = std::env::var("CVMATCH_HOME") {
            return Ok(PathBuf::from(home));
        }
        dirs::home_dir()
            .map(|h| h.join(CLIENT_HOME_DIR))
            .context("Home directory not found, set CVMATCH_HOME")
    }
}
