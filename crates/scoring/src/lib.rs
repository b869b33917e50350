//! Scoring - feasibility scoring and conflict detection for FleetMatch
//!
//! This crate evaluates pilot/drone/mission pairings against a roster
//! snapshot. It handles:
//! - Seven rule checks (skills, certifications, locations, availability, capabilities)
//! - Feasibility scoring with a recommendation threshold
//! - Whole-roster conflict scans with recommended alternatives
//!
//! # Feasibility Scoring
//!
//! Each pairing starts at 100:
//! - **Medium** findings cost 15 points
//! - **High** findings cost 40 points plus a 20 point critical surcharge
//! - **Low** findings are informational
//!
//! Scores are clamped to 0..=100; a score at or above the threshold
//! (default 50) is recommended.
//!
//! # Examples
//!
//! ```no_run
//! use fleetmatch_domain::RosterSnapshot;
//! use fleetmatch_scoring::{scan_conflicts, score_candidates};
//!
//! let snapshot = RosterSnapshot::empty();
//! if let Some(mission) = snapshot.mission("PRJ001") {
//!     let ranked = score_candidates(&snapshot, mission, snapshot.pilots(), snapshot.drones());
//!     println!("{} pairings scored", ranked.len());
//! }
//! let report = scan_conflicts(&snapshot, chrono::Utc::now().date_naive());
//! println!("{} conflicts", report.total);
//! ```

pub mod checks;
pub mod feasibility;
pub mod findings;
pub mod scanner;

pub use feasibility::{
    score_candidates, score_findings, FeasibilityResult, FeasibilityScorer, Recommendation,
};
pub use findings::{CheckKind, ConflictFinding, Severity};
pub use scanner::{scan_conflicts, ConflictReport, ConflictScanner, ScannedConflict};
