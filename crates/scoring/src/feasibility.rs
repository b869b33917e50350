//! Feasibility scoring
//!
//! This module turns the findings for a (mission, pilot, drone) triple into
//! a 0-100 score:
//! - Each finding subtracts its severity penalty (Low 0, Medium 15, High 40)
//! - Each High finding subtracts a further 20 (critical surcharge)
//! - The result is clamped to 0..=100
//!
//! A pairing scoring at or above the threshold is recommended.

#![warn(missing_docs)]

use crate::checks;
use crate::findings::{ConflictFinding, Severity};
use fleetmatch_core::ScoringConfig;
use fleetmatch_domain::{Drone, Mission, Pilot, RosterSnapshot};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Extra penalty per High finding, on top of its severity penalty
pub const CRITICAL_SURCHARGE: u32 = 20;

/// Recommendation derived from the score and threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    /// Score at or above the threshold
    Recommended,
    /// Score below the threshold
    NotRecommended,
}

/// Scored (mission, pilot, drone) pairing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeasibilityResult {
    /// Mission under evaluation
    pub mission_id: String,
    /// Proposed pilot
    pub pilot_id: String,
    /// Proposed drone
    pub drone_id: String,
    /// Score in 0..=100
    pub score: u8,
    /// Every finding the checks produced, in check order
    pub findings: Vec<ConflictFinding>,
    /// Threshold verdict
    pub recommendation: Recommendation,
    /// One-line summary of the score and issues
    pub reasoning: String,
}

impl FeasibilityResult {
    /// Check if the pairing meets the threshold
    pub fn is_recommended(&self) -> bool {
        self.recommendation == Recommendation::Recommended
    }
}

/// Compute the score for a set of findings
///
/// # Arguments
/// * `findings` - Findings from the rule checks
///
/// # Returns
/// Score clamped to 0..=100
pub fn score_findings(findings: &[ConflictFinding]) -> u8 {
    let penalty: u32 = findings
        .iter()
        .map(|f| match f.severity {
            Severity::High => f.severity.penalty() + CRITICAL_SURCHARGE,
            other => other.penalty(),
        })
        .sum();
    100u32.saturating_sub(penalty) as u8
}

/// Descending score, then pilot id, then drone id
fn rank(a: &FeasibilityResult, b: &FeasibilityResult) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.pilot_id.cmp(&b.pilot_id))
        .then_with(|| a.drone_id.cmp(&b.drone_id))
}

/// Pairing scorer
#[derive(Debug, Clone)]
pub struct FeasibilityScorer {
    /// Minimum score (inclusive) for a recommendation
    threshold: u8,
}

impl FeasibilityScorer {
    /// Default recommendation threshold
    pub const DEFAULT_THRESHOLD: u8 = 50;

    /// Create a scorer with the default threshold
    pub fn new() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    /// Create scorer with custom threshold (capped at 100)
    pub fn with_threshold(threshold: u8) -> Self {
        Self {
            threshold: threshold.min(100),
        }
    }

    /// Create scorer from the scoring configuration
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::with_threshold(config.feasibility_threshold)
    }

    /// Recommendation threshold
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Score one pairing
    ///
    /// # Arguments
    /// * `snapshot` - Roster the pilot's and drone's current bookings are looked up in
    /// * `mission` - Mission to staff
    /// * `pilot` - Proposed pilot
    /// * `drone` - Proposed drone
    ///
    /// # Returns
    /// The score, all findings and a reasoning summary
    pub fn score_pair(
        &self,
        snapshot: &RosterSnapshot,
        mission: &Mission,
        pilot: &Pilot,
        drone: &Drone,
    ) -> FeasibilityResult {
        let findings = checks::run_all(snapshot, mission, pilot, drone);
        let score = score_findings(&findings);
        let recommendation = if score >= self.threshold {
            Recommendation::Recommended
        } else {
            Recommendation::NotRecommended
        };

        let mut reasoning = match recommendation {
            Recommendation::Recommended => format!("High feasibility assignment ({}%)", score),
            Recommendation::NotRecommended => format!("Low feasibility assignment ({}%)", score),
        };
        let issues: Vec<&str> = findings
            .iter()
            .filter(|f| f.severity > Severity::Low)
            .map(|f| f.message.as_str())
            .collect();
        if issues.is_empty() {
            reasoning.push_str(" | No major conflicts detected");
        } else {
            reasoning.push_str(" | Issues: ");
            reasoning.push_str(&issues.join("; "));
        }

        FeasibilityResult {
            mission_id: mission.id.clone(),
            pilot_id: pilot.id.clone(),
            drone_id: drone.id.clone(),
            score,
            findings,
            recommendation,
            reasoning,
        }
    }

    /// Score every (pilot, drone) pairing for `mission`.
    ///
    /// Results are sorted by score descending, ties broken by pilot id then
    /// drone id. An empty pilot or drone slice yields an empty list.
    pub fn score_candidates(
        &self,
        snapshot: &RosterSnapshot,
        mission: &Mission,
        pilots: &[Pilot],
        drones: &[Drone],
    ) -> Vec<FeasibilityResult> {
        let mut results: Vec<FeasibilityResult> = pilots
            .iter()
            .flat_map(|pilot| {
                drones
                    .iter()
                    .map(move |drone| self.score_pair(snapshot, mission, pilot, drone))
            })
            .collect();
        results.sort_by(rank);
        debug!(
            mission = %mission.id,
            pairs = results.len(),
            best = results.first().map(|r| r.score),
            "Scored candidates"
        );
        results
    }

    /// Recommended pairings only, in rank order
    pub fn recommend(
        &self,
        snapshot: &RosterSnapshot,
        mission: &Mission,
        pilots: &[Pilot],
        drones: &[Drone],
    ) -> Vec<FeasibilityResult> {
        self.score_candidates(snapshot, mission, pilots, drones)
            .into_iter()
            .filter(FeasibilityResult::is_recommended)
            .collect()
    }

    /// Highest-ranked recommended pairing, if any
    pub fn best_assignment(
        &self,
        snapshot: &RosterSnapshot,
        mission: &Mission,
        pilots: &[Pilot],
        drones: &[Drone],
    ) -> Option<FeasibilityResult> {
        self.recommend(snapshot, mission, pilots, drones)
            .into_iter()
            .next()
    }
}

impl Default for FeasibilityScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Score every pairing for `mission` with the default scorer
pub fn score_candidates(
    snapshot: &RosterSnapshot,
    mission: &Mission,
    pilots: &[Pilot],
    drones: &[Drone],
) -> Vec<FeasibilityResult> {
    FeasibilityScorer::default().score_candidates(snapshot, mission, pilots, drones)
}
