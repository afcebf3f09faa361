//! services/client/src/error.rs
//!
//! Defines the primary error type for the client service.

use crate::config::ConfigError;
use tradevision_core::ports::PortError;
use tradevision_core::validation::{FieldErrors, FileRejection};

/// The primary error type for the `client` service.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// A form failed client-side validation; no request was sent.
    #[error("Validation failed: {0:?}")]
    Validation(FieldErrors),

    /// A protected operation was attempted without a session.
    #[error("Not logged in. Run `tradevision login` first.")]
    NotAuthenticated,

    /// A chart file was rejected before upload.
    #[error("File rejected: {0}")]
    File(#[from] FileRejection),

    /// Represents an error from building the underlying HTTP client.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Represents a standard Input/Output error (e.g., reading an upload from disk).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}
