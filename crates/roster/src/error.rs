//! Roster loading and update errors

use fleetmatch_domain::{DomainError, RecordKind};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, updating or exporting the roster
#[derive(Debug, Error)]
pub enum RosterError {
    /// File could not be opened or written
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV reader/writer failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A table lacks a column every row needs
    #[error("{table} table is missing required column '{column}'")]
    MissingColumn { table: RecordKind, column: &'static str },

    /// A row left a required cell blank
    #[error("{table} row {row}: missing required field '{column}'")]
    MissingField {
        table: RecordKind,
        row: usize,
        column: &'static str,
    },

    /// Non-date text in a date column
    #[error("{table} row {row}: invalid date '{value}' in column '{column}'")]
    InvalidDate {
        table: RecordKind,
        row: usize,
        column: &'static str,
        value: String,
    },

    /// Unrecognised enumerated value (status, priority)
    #[error("{table} row {row}: invalid value '{value}' in column '{column}'")]
    InvalidField {
        table: RecordKind,
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("Unknown pilot: {0}")]
    UnknownPilot(String),

    #[error("Unknown drone: {0}")]
    UnknownDrone(String),

    #[error("Unknown mission: {0}")]
    UnknownMission(String),

    /// Update would break a roster invariant
    #[error("Invalid update: {0}")]
    InvalidUpdate(String),

    /// Store has no source to reload from
    #[error("Roster has no source to reload from")]
    NoSource,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub type Result<T> = std::result::Result<T, RosterError>;
