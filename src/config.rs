use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON file holding the catalog array
    pub catalog_path: PathBuf,
    /// Directory for the persisted saved-set
    pub store_dir: PathBuf,
    /// Simulated catalog latency
    pub latency: Duration,
    /// Raw JSON filter spec to run at startup
    pub filter_json: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("data/properties.json"),
            store_dir: PathBuf::from(".home-finder"),
            latency: Duration::ZERO,
            filter_json: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let latency = match lookup("HOME_FINDER_LATENCY_MS") {
            Some(raw) => Duration::from_millis(
                raw.trim()
                    .parse()
                    .context("HOME_FINDER_LATENCY_MS must be a valid number")?,
            ),
            None => defaults.latency,
        };

        Ok(Self {
            catalog_path: lookup("HOME_FINDER_CATALOG")
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_path),
            store_dir: lookup("HOME_FINDER_STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_dir),
            latency,
            filter_json: lookup("HOME_FINDER_FILTER").filter(|raw| !raw.trim().is_empty()),
        })
    }
}
