//! Conflict scanner
//!
//! Runs the rule checks over the assignments already recorded in a roster
//! snapshot, adds the imminent-mission rule and data-quality findings, and
//! attaches recommended alternatives to every blocking finding.

use crate::checks;
use crate::feasibility::{FeasibilityResult, FeasibilityScorer};
use crate::findings::{CheckKind, ConflictFinding, Severity};
use chrono::NaiveDate;
use fleetmatch_core::ScoringConfig;
use fleetmatch_domain::{
    Drone, DroneStatus, Mission, Pilot, PilotStatus, RosterSnapshot, DATE_FORMAT,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// A finding plus the alternatives proposed for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedConflict {
    #[serde(flatten)]
    pub finding: ConflictFinding,
    /// Suggested next step, set for blocking findings on a mission
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    /// Recommended pairings drawn from available resources
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<FeasibilityResult>,
}

/// Result of a full scan, ordered High, Medium, Low
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    /// Date the scan was evaluated against
    pub today: NaiveDate,
    pub conflicts: Vec<ScannedConflict>,
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl ConflictReport {
    fn new(today: NaiveDate, conflicts: Vec<ScannedConflict>) -> Self {
        let count = |severity| {
            conflicts
                .iter()
                .filter(|c| c.finding.severity == severity)
                .count()
        };
        Self {
            today,
            total: conflicts.len(),
            high: count(Severity::High),
            medium: count(Severity::Medium),
            low: count(Severity::Low),
            conflicts,
        }
    }

    /// Check if the roster has no findings at all
    pub fn is_clean(&self) -> bool {
        self.total == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScannedConflict> {
        self.conflicts.iter()
    }
}

/// Whole-roster conflict scanner
#[derive(Debug, Clone)]
pub struct ConflictScanner {
    scorer: FeasibilityScorer,
    /// Upper bound on suggestions per finding
    max_suggestions: usize,
    /// Lookahead for the imminent incomplete mission rule
    imminent_days: i64,
}

impl ConflictScanner {
    pub const DEFAULT_MAX_SUGGESTIONS: usize = 3;
    pub const DEFAULT_IMMINENT_DAYS: i64 = 3;

    pub fn new() -> Self {
        Self {
            scorer: FeasibilityScorer::new(),
            max_suggestions: Self::DEFAULT_MAX_SUGGESTIONS,
            imminent_days: Self::DEFAULT_IMMINENT_DAYS,
        }
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        Self {
            scorer: FeasibilityScorer::from_config(config),
            max_suggestions: config.max_suggestions,
            imminent_days: config.imminent_days,
        }
    }

    pub fn with_scorer(mut self, scorer: FeasibilityScorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_max_suggestions(mut self, max_suggestions: usize) -> Self {
        self.max_suggestions = max_suggestions;
        self
    }

    pub fn with_imminent_days(mut self, imminent_days: i64) -> Self {
        self.imminent_days = imminent_days;
        self
    }

    pub fn scorer(&self) -> &FeasibilityScorer {
        &self.scorer
    }

    /// Scan the whole roster as of `today`
    pub fn scan(&self, snapshot: &RosterSnapshot, today: NaiveDate) -> ConflictReport {
        let mut findings = data_quality_findings(snapshot);
        for pilot in snapshot.pilots() {
            findings.extend(pilot_findings(snapshot, pilot, today));
        }
        for drone in snapshot.drones() {
            findings.extend(drone_findings(snapshot, drone));
        }
        for mission in snapshot.missions() {
            findings.extend(self.check_imminent(snapshot, mission, today));
        }

        // Stable: production order is kept within a severity
        findings.sort_by(|a, b| b.severity.cmp(&a.severity));

        let mut cache: HashMap<String, Vec<FeasibilityResult>> = HashMap::new();
        let conflicts: Vec<ScannedConflict> = findings
            .into_iter()
            .map(|finding| self.annotate(snapshot, finding, &mut cache))
            .collect();

        let report = ConflictReport::new(today, conflicts);
        info!(
            today = %today.format(DATE_FORMAT),
            total = report.total,
            high = report.high,
            medium = report.medium,
            low = report.low,
            "Conflict scan complete"
        );
        report
    }

    /// Rule 8: mission starting within the lookahead without a pilot or a drone
    fn check_imminent(
        &self,
        snapshot: &RosterSnapshot,
        mission: &Mission,
        today: NaiveDate,
    ) -> Option<ConflictFinding> {
        let days = mission.days_until_start(today);
        if days < 0 || days > self.imminent_days || mission.end_date < today {
            return None;
        }
        let mut missing = Vec::new();
        if snapshot.pilots_assigned_to(&mission.id).next().is_none() {
            missing.push("pilot");
        }
        if snapshot.drones_assigned_to(&mission.id).next().is_none() {
            missing.push("drone");
        }
        if missing.is_empty() {
            return None;
        }
        Some(
            ConflictFinding::new(
                CheckKind::ImminentIncompleteMission,
                format!(
                    "Mission {} starts in {} days with missing {}",
                    mission.client,
                    days,
                    missing.join(", ")
                ),
            )
            .with_mission(&mission.id),
        )
    }

    fn annotate(
        &self,
        snapshot: &RosterSnapshot,
        finding: ConflictFinding,
        cache: &mut HashMap<String, Vec<FeasibilityResult>>,
    ) -> ScannedConflict {
        let mission = finding
            .mission_id
            .as_deref()
            .filter(|_| finding.is_high())
            .and_then(|id| snapshot.mission(id));
        let Some(mission) = mission else {
            return ScannedConflict {
                finding,
                recommendation: None,
                suggestions: Vec::new(),
            };
        };

        let suggestions = cache
            .entry(mission.id.clone())
            .or_insert_with(|| self.suggest(snapshot, mission))
            .clone();
        let recommendation = Some(match suggestions.first() {
            Some(best) => format!(
                "Reassign to pilot {} with drone {} (feasibility {}%)",
                best.pilot_id, best.drone_id, best.score
            ),
            None => "No recommended alternative: add resources or delay the mission".to_string(),
        });
        ScannedConflict {
            finding,
            recommendation,
            suggestions,
        }
    }

    /// Up to `max_suggestions` recommended pairings from available resources.
    ///
    /// A pairing scoring under `FeasibilityScorer::DEFAULT_THRESHOLD` is never
    /// suggested, even when the scorer's own threshold is lower.
    fn suggest(&self, snapshot: &RosterSnapshot, mission: &Mission) -> Vec<FeasibilityResult> {
        let pilots: Vec<Pilot> = snapshot
            .pilots()
            .iter()
            .filter(|p| p.is_available())
            .cloned()
            .collect();
        let drones: Vec<Drone> = snapshot
            .drones()
            .iter()
            .filter(|d| d.is_available())
            .cloned()
            .collect();
        let floor = self
            .scorer
            .threshold()
            .max(FeasibilityScorer::DEFAULT_THRESHOLD);
        let mut suggestions: Vec<FeasibilityResult> = self
            .scorer
            .score_candidates(snapshot, mission, &pilots, &drones)
            .into_iter()
            .filter(|r| r.score >= floor)
            .collect();
        suggestions.truncate(self.max_suggestions);
        debug!(mission = %mission.id, suggestions = suggestions.len(), "Computed alternatives");
        suggestions
    }
}

impl Default for ConflictScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Duplicate ids and inverted mission windows
fn data_quality_findings(snapshot: &RosterSnapshot) -> Vec<ConflictFinding> {
    let mut findings: Vec<ConflictFinding> = snapshot
        .duplicate_ids()
        .into_iter()
        .map(|dup| {
            ConflictFinding::new(
                CheckKind::DuplicateRecord,
                format!("{} id {} appears {} times", dup.kind, dup.id, dup.count),
            )
        })
        .collect();
    findings.extend(snapshot.missions().iter().filter_map(checks::check_mission_window));
    findings
}

fn pilot_findings(
    snapshot: &RosterSnapshot,
    pilot: &Pilot,
    today: NaiveDate,
) -> Vec<ConflictFinding> {
    let mut findings = Vec::new();
    match pilot.current_assignment.as_deref() {
        Some(id) => match snapshot.mission(id) {
            Some(mission) => findings.extend(
                [
                    checks::check_skills(mission, pilot),
                    checks::check_certifications(mission, pilot),
                    checks::check_pilot_location(mission, pilot),
                    checks::check_pilot_readiness(mission, pilot),
                ]
                .into_iter()
                .flatten(),
            ),
            None => findings.push(
                ConflictFinding::new(
                    CheckKind::AssignmentMismatch,
                    format!("Pilot {} has assignment {} but not in mission list", pilot.name, id),
                )
                .with_pilot(&pilot.id),
            ),
        },
        None if pilot.status == PilotStatus::Assigned => findings.push(
            ConflictFinding::new(
                CheckKind::AssignmentMismatch,
                format!("Pilot {} is Assigned with no current assignment", pilot.name),
            )
            .with_pilot(&pilot.id),
        ),
        None => {}
    }

    if let Some(from) = pilot.available_from.filter(|from| pilot.is_available() && *from > today) {
        findings.push(
            ConflictFinding::new(
                CheckKind::StatusInconsistent,
                format!(
                    "Pilot {} is Available but available from {}",
                    pilot.name,
                    from.format(DATE_FORMAT)
                ),
            )
            .with_pilot(&pilot.id),
        );
    }
    findings
}

fn drone_findings(snapshot: &RosterSnapshot, drone: &Drone) -> Vec<ConflictFinding> {
    match drone.current_assignment.as_deref() {
        Some(id) => match snapshot.mission(id) {
            Some(mission) => [
                checks::check_capabilities(mission, drone),
                checks::check_drone_location(mission, drone),
                checks::check_drone_readiness(mission, drone),
            ]
            .into_iter()
            .flatten()
            .collect(),
            None => vec![ConflictFinding::new(
                CheckKind::AssignmentMismatch,
                format!("Drone {} has assignment {} but not in mission list", drone.model, id),
            )
            .with_drone(&drone.id)],
        },
        None if drone.status == DroneStatus::InUse => vec![ConflictFinding::new(
            CheckKind::AssignmentMismatch,
            format!("Drone {} is In Use with no current assignment", drone.model),
        )
        .with_drone(&drone.id)],
        None => Vec::new(),
    }
}

/// Scan `snapshot` with the default scanner
pub fn scan_conflicts(snapshot: &RosterSnapshot, today: NaiveDate) -> ConflictReport {
    ConflictScanner::default().scan(snapshot, today)
}
