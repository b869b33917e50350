//! Conflict findings produced by rule checks and the conflict scanner

#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// Finding severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, no score penalty
    Low,
    /// Degrades the assignment (15 points)
    Medium,
    /// Blocks the assignment (40 points plus the critical surcharge)
    High,
}

impl Severity {
    /// Score penalty for one finding of this severity
    pub fn penalty(&self) -> u32 {
        match self {
            Severity::Low => 0,
            Severity::Medium => 15,
            Severity::High => 40,
        }
    }

    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a finding is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Pilot lacks a required skill
    SkillMismatch,
    /// Pilot lacks a required certification
    CertificationMismatch,
    /// Pilot is based elsewhere
    PilotLocationMismatch,
    /// Pilot on leave, not yet available, or booked on an overlapping mission
    PilotUnavailable,
    /// Drone in maintenance or booked on an overlapping mission
    DroneUnavailable,
    /// Drone lacks a required capability
    CapabilityMismatch,
    /// Drone is based elsewhere
    DroneLocationMismatch,
    /// Mission starts soon without a pilot or drone
    ImminentIncompleteMission,
    /// Assignment field disagrees with status or names an unknown mission
    AssignmentMismatch,
    /// Status disagrees with the availability date
    StatusInconsistent,
    /// Mission ends before it starts
    InvalidDateRange,
    /// Id shared by several records
    DuplicateRecord,
}

impl CheckKind {
    /// Severity every finding of this kind carries
    pub fn severity(&self) -> Severity {
        match self {
            CheckKind::CertificationMismatch
            | CheckKind::PilotUnavailable
            | CheckKind::DroneUnavailable
            | CheckKind::ImminentIncompleteMission => Severity::High,
            CheckKind::SkillMismatch
            | CheckKind::PilotLocationMismatch
            | CheckKind::CapabilityMismatch
            | CheckKind::DroneLocationMismatch
            | CheckKind::AssignmentMismatch => Severity::Medium,
            CheckKind::StatusInconsistent
            | CheckKind::InvalidDateRange
            | CheckKind::DuplicateRecord => Severity::Low,
        }
    }

    /// snake_case label, as serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::SkillMismatch => "skill_mismatch",
            CheckKind::CertificationMismatch => "certification_mismatch",
            CheckKind::PilotLocationMismatch => "pilot_location_mismatch",
            CheckKind::PilotUnavailable => "pilot_unavailable",
            CheckKind::DroneUnavailable => "drone_unavailable",
            CheckKind::CapabilityMismatch => "capability_mismatch",
            CheckKind::DroneLocationMismatch => "drone_location_mismatch",
            CheckKind::ImminentIncompleteMission => "imminent_incomplete_mission",
            CheckKind::AssignmentMismatch => "assignment_mismatch",
            CheckKind::StatusInconsistent => "status_inconsistent",
            CheckKind::InvalidDateRange => "invalid_date_range",
            CheckKind::DuplicateRecord => "duplicate_record",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single failed check or data-quality problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictFinding {
    /// Check that produced the finding
    pub kind: CheckKind,
    /// Severity, fixed by `kind`
    pub severity: Severity,
    /// Human-readable explanation
    pub message: String,
    /// Mission involved, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mission_id: Option<String>,
    /// Pilot involved, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pilot_id: Option<String>,
    /// Drone involved, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drone_id: Option<String>,
}

impl ConflictFinding {
    /// Create a finding with the severity of `kind`
    pub fn new(kind: CheckKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            message: message.into(),
            mission_id: None,
            pilot_id: None,
            drone_id: None,
        }
    }

    /// Attach the mission id
    pub fn with_mission(mut self, id: &str) -> Self {
        self.mission_id = Some(id.to_string());
        self
    }

    /// Attach the pilot id
    pub fn with_pilot(mut self, id: &str) -> Self {
        self.pilot_id = Some(id.to_string());
        self
    }

    /// Attach the drone id
    pub fn with_drone(mut self, id: &str) -> Self {
        self.drone_id = Some(id.to_string());
        self
    }

    /// Check if this is a blocking finding
    pub fn is_high(&self) -> bool {
        self.severity == Severity::High
    }
}

impl fmt::Display for ConflictFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.kind, self.message)
    }
}
