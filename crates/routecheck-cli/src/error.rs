//! Error types for the CLI

use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Errors that end a `routecheck` run early
#[derive(Debug, Error)]
pub enum CliError {
    /// Async runtime or logging could not be set up
    #[error("Runtime error: {message}")]
    Runtime {
        /// Error message
        message: String,
    },

    /// At least one case failed and `--strict` was given
    #[error("Test execution failed: {message}")]
    TestExecution {
        /// Error message
        message: String,
    },

    /// Ctrl-C arrived before the suite finished
    #[error("Tests interrupted by user")]
    Interrupted,

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Routecheck library error
    #[error("{0}")]
    Suite(#[from] routecheck::RoutecheckError),
}

impl CliError {
    /// Create a runtime error
    #[must_use]
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
        }
    }

    /// Create a test execution error
    #[must_use]
    pub fn test_execution(message: impl Into<String>) -> Self {
        Self::TestExecution {
            message: message.into(),
        }
    }

    /// Whether this error came from Ctrl-C
    #[must_use]
    pub const fn is_interrupt(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}
