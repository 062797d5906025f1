//! Result and error types for Routecheck.

use crate::llm::LlmClientError;
use thiserror::Error;

/// Result type for Routecheck operations
pub type RoutecheckResult<T> = Result<T, RoutecheckError>;

/// Errors that stop a suite from starting
#[derive(Debug, Error)]
pub enum RoutecheckError {
    /// Invalid suite configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// HTTP client could not be built
    #[error("Client error: {0}")]
    Client(#[from] LlmClientError),
}

impl RoutecheckError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
