//! services/client/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! Configuration is loaded from environment variables at startup. The backend
//! base URL may also be baked in at build time; the `.env` file is used for
//! local development.

use reqwest::Url;
use std::path::PathBuf;
use tracing::Level;

/// Fallback backend address for local development.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// Base URL captured when the binary was built, if the variable was set then.
const BUILD_API_BASE_URL: Option<&str> = option_env!("TRADEVISION_API_BASE_URL");

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: Url,
    pub log_level: Level,
    /// File holding the persisted session (`token` and `user`).
    pub storage_path: PathBuf,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to keep tests hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Backend Address ---
        let base_url_str = std::env::var("TRADEVISION_API_BASE_URL")
            .ok()
            .or_else(|| BUILD_API_BASE_URL.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = parse_base_url(&base_url_str)?;

        // --- Logging ---
        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Session Persistence ---
        let storage_path = std::env::var("TRADEVISION_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./.tradevision/session.json"));

        Ok(Self {
            api_base_url,
            log_level,
            storage_path,
        })
    }

    /// A configuration pointing at `base_url` with default logging and storage.
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: parse_base_url(base_url)?,
            log_level: Level::INFO,
            storage_path: PathBuf::from("./.tradevision/session.json"),
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| {
        ConfigError::InvalidValue("TRADEVISION_API_BASE_URL".to_string(), e.to_string())
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidValue(
            "TRADEVISION_API_BASE_URL".to_string(),
            format!("'{}' cannot be used as a base URL", raw),
        ));
    }
    Ok(url)
}
