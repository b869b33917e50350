//! Domain errors
//!
//! Pure domain errors with no infrastructure dependencies

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid date range: end {end} precedes start {start}")]
    InvalidDateRange { start: String, end: String },

    #[error("Invalid value '{value}' for field {field}")]
    InvalidField { field: &'static str, value: String },

    #[error("Unknown {kind}: {id}")]
    UnknownEntity { kind: &'static str, id: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
