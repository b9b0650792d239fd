//! services/client/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use reqwest::Url;
use std::path::PathBuf;
use tracing::Level;

pub const DEFAULT_API_URL: &str = "https://lee-movies.herokuapp.com/";
pub const DEFAULT_SESSION_PATH: &str = ".myflix/session.json";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: Url,
    pub session_path: PathBuf,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let api_url_str =
            std::env::var("MYFLIX_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_url = parse_base_url(&api_url_str)
            .map_err(|e| ConfigError::InvalidValue("MYFLIX_API_URL".to_string(), e))?;

        let session_path = std::env::var("MYFLIX_SESSION_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SESSION_PATH));

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            api_url,
            session_path,
            log_level,
        })
    }
}

/// Parses the API origin and makes sure its path ends with `/`, so relative
/// joins never drop the last path segment.
pub fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw).map_err(|e| e.to_string())?;
    if url.cannot_be_a_base() {
        return Err(format!("'{}' cannot be used as a base URL", raw));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
