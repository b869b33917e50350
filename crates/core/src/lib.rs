//! Core functionality shared by the FleetMatch crates.
//!
//! This crate provides configuration loading, logging initialization and the
//! core error type used across the FleetMatch workspace.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, DataConfig, LogFormat, LoggingConfig, ScoringConfig};
pub use error::{CoreError, Result};
