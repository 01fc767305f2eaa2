use anyhow::{Context, Result};

/// Runtime configuration, read from the environment (and `.env` via dotenvy,
/// loaded by the binary before this runs).
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    /// Override for the data endpoint host; used by tests and proxies
    pub base_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ALPHAVANTAGE_API_KEY")
            .context("ALPHAVANTAGE_API_KEY not found in environment")?;
        let base_url = std::env::var("ALPHAVANTAGE_BASE_URL").ok();

        Ok(Self { api_key, base_url })
    }
}
