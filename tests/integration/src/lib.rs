//! Integration tests across the roster and scoring crates
//!
//! This test suite validates:
//! - Loading a CSV roster and scoring candidate pairings end to end
//! - Whole-roster conflict scans with recommended alternatives
//! - Assignment updates feeding back into later scans
//! - Equivalence of the CSV and value-grid sources

pub mod test_utils;

#[cfg(test)]
mod assignment_tests;

#[cfg(test)]
mod conflict_scan_tests;
