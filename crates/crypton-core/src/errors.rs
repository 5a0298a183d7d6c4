//! Error types for the Crypton console core
//!
//! Command handling never fails; these errors only surface while building
//! the console (configuration validation, runtime wiring).

use thiserror::Error;

/// Errors raised while constructing or configuring the console core
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("No async runtime available: {reason}")]
    RuntimeUnavailable { reason: String },
}

impl ConsoleError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        ConsoleError::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

/// Result type for console core operations
pub type ConsoleResult<T> = std::result::Result<T, ConsoleError>;
