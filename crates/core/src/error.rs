//! Core error types

use thiserror::Error;

/// Core error type for FleetMatch
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration failed validation
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
