//! services/client/src/error.rs
//!
//! Defines the primary error type for the client service.

use crate::config::ConfigError;
use myflix_core::ports::PortError;

/// The primary error type for the `client` service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core ports.
    #[error("{0}")]
    Port(#[from] PortError),

    /// Represents a failure to set up the HTTP client itself.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Bad command-line arguments.
    #[error("{0}")]
    Usage(String),
}
