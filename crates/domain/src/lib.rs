//! Domain module for FleetMatch
//!
//! This crate contains the pure fleet model with no I/O dependencies:
//! - Pilot, drone and mission records with typed statuses
//! - Case-insensitive tag sets for skills, certifications and capabilities
//! - Inclusive date ranges and the overlap rule
//! - Immutable roster snapshots handed to the scoring engine

pub mod error;
pub mod model;
pub mod schedule;
pub mod snapshot;
pub mod tags;

pub use error::{DomainError, Result};
pub use model::{
    derive_capabilities, locations_match, Drone, DroneStatus, Mission, MissionPriority, Pilot,
    PilotStatus,
};
pub use schedule::{parse_date, DateRange, DATE_FORMAT};
pub use snapshot::{DuplicateRecord, RecordKind, RosterSnapshot};
pub use tags::TagSet;
