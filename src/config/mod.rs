use std::path::PathBuf;

use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

fn default_max_connections() -> u32 {
    5
}

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Database connection URL. Not needed when running against the
    /// in-memory store.
    pub database_url: Option<String>,

    /// Upper bound for the connection pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Where to write logs while the terminal UI owns the screen
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `.env` (if it exists) and the environment
    pub fn load() -> Result<Self> {
        dotenv().ok();

        let config = envy::from_env::<Config>()?;

        Ok(config)
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }
}

/// Initialize environment variables and load configuration
pub fn init() -> Result<Config> {
    Config::load()
}
