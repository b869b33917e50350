//! Roster - the FleetMatch entity store
//!
//! This crate loads pilot, drone and mission tables and hands them to the
//! scoring engine as immutable snapshots. It handles:
//! - CSV files and spreadsheet-style value grids as interchangeable sources
//! - Row validation at the boundary (typed statuses, dates, tag sets)
//! - Read and filter accessors over the current snapshot
//! - Field-level status and assignment updates with invariant checks
//! - CSV write-back and an operational summary
//!
//! # Examples
//!
//! ```no_run
//! use fleetmatch_roster::{CsvPaths, CsvSource, RosterStore};
//!
//! let store = RosterStore::load(CsvSource::new(CsvPaths::in_dir("data")))?;
//! let snapshot = store.snapshot();
//! println!("{} pilots available", store.available_pilots().len());
//! # Ok::<(), fleetmatch_roster::RosterError>(())
//! ```

pub mod error;
pub mod rows;
pub mod source;
pub mod store;

pub use error::{Result, RosterError};
pub use rows::{parse_drones, parse_missions, parse_pilots, ParseOptions, RawTable};
pub use source::{write_csv, CsvPaths, CsvSource, GridSource, RosterSource, RosterTables};
pub use store::{DroneFilter, PilotFilter, RosterStats, RosterStore};
