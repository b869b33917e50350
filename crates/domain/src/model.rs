//! Fleet records: pilots, drones and missions
//!
//! Records are plain values. They are created and updated only by the roster
//! layer; the scoring engine reads them through a [`crate::RosterSnapshot`].

use crate::error::DomainError;
use crate::schedule::DateRange;
use crate::tags::TagSet;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pilot roster status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PilotStatus {
    /// Free to take a mission
    Available,
    /// Committed to `current_assignment`
    Assigned,
    /// Not flying until further notice
    #[serde(rename = "On Leave")]
    OnLeave,
}

/// Drone fleet status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DroneStatus {
    /// Ready for assignment
    Available,
    /// Grounded for servicing
    Maintenance,
    /// Flying `current_assignment`
    #[serde(rename = "In Use")]
    InUse,
}

/// Mission priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MissionPriority {
    Standard,
    High,
    Urgent,
}

/// Compare spellings ignoring case, whitespace, '_' and '-'
fn normalized(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

impl PilotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PilotStatus::Available => "Available",
            PilotStatus::Assigned => "Assigned",
            PilotStatus::OnLeave => "On Leave",
        }
    }
}

impl FromStr for PilotStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalized(s).as_str() {
            "available" => Ok(PilotStatus::Available),
            "assigned" => Ok(PilotStatus::Assigned),
            "onleave" => Ok(PilotStatus::OnLeave),
            _ => Err(DomainError::InvalidField {
                field: "pilot status",
                value: s.to_string(),
            }),
        }
    }
}

impl DroneStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DroneStatus::Available => "Available",
            DroneStatus::Maintenance => "Maintenance",
            DroneStatus::InUse => "In Use",
        }
    }
}

impl FromStr for DroneStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalized(s).as_str() {
            "available" => Ok(DroneStatus::Available),
            "maintenance" => Ok(DroneStatus::Maintenance),
            "inuse" => Ok(DroneStatus::InUse),
            _ => Err(DomainError::InvalidField {
                field: "drone status",
                value: s.to_string(),
            }),
        }
    }
}

impl MissionPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionPriority::Standard => "Standard",
            MissionPriority::High => "High",
            MissionPriority::Urgent => "Urgent",
        }
    }
}

impl FromStr for MissionPriority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalized(s).as_str() {
            "standard" => Ok(MissionPriority::Standard),
            "high" => Ok(MissionPriority::High),
            "urgent" => Ok(MissionPriority::Urgent),
            _ => Err(DomainError::InvalidField {
                field: "mission priority",
                value: s.to_string(),
            }),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(PilotStatus, DroneStatus, MissionPriority);

/// Case-insensitive location comparison
pub fn locations_match(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim(), b.trim());
    !a.is_empty() && a.to_lowercase() == b.to_lowercase()
}

/// Pilot roster entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pilot {
    /// Unique pilot identifier
    pub id: String,
    /// Full name
    pub name: String,
    pub skills: TagSet,
    pub certifications: TagSet,
    /// Current base location
    pub location: String,
    pub status: PilotStatus,
    /// Mission the pilot is committed to, if any
    pub current_assignment: Option<String>,
    /// First day the pilot can fly; `None` when the roster left it blank
    pub available_from: Option<NaiveDate>,
}

impl Pilot {
    /// Check if pilot is free for new work
    pub fn is_available(&self) -> bool {
        self.status == PilotStatus::Available
    }

    /// Check if pilot is committed to `mission_id`
    pub fn is_assigned_to(&self, mission_id: &str) -> bool {
        self.current_assignment.as_deref() == Some(mission_id)
    }
}

/// Drone fleet entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drone {
    /// Unique drone identifier
    pub id: String,
    /// Model name
    pub model: String,
    /// Payloads and sensors (RGB, Thermal, LiDAR, ...)
    pub capabilities: TagSet,
    pub status: DroneStatus,
    pub location: String,
    pub current_assignment: Option<String>,
    /// Next scheduled maintenance
    pub maintenance_due: Option<NaiveDate>,
}

impl Drone {
    /// Check if drone is free for new work
    pub fn is_available(&self) -> bool {
        self.status == DroneStatus::Available
    }

    pub fn is_assigned_to(&self, mission_id: &str) -> bool {
        self.current_assignment.as_deref() == Some(mission_id)
    }
}

/// Mission (project) entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    /// Unique mission identifier
    pub id: String,
    pub client: String,
    pub location: String,
    pub required_skills: TagSet,
    pub required_certs: TagSet,
    /// Drone capabilities the mission needs
    pub required_capabilities: TagSet,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub priority: MissionPriority,
}

impl Mission {
    /// Mission window, or `None` when the end precedes the start
    pub fn window(&self) -> Option<DateRange> {
        DateRange::new(self.start_date, self.end_date).ok()
    }

    /// Signed whole days from `today` until the mission starts
    pub fn days_until_start(&self, today: NaiveDate) -> i64 {
        (self.start_date - today).num_days()
    }

    /// Check if `today` falls within the mission window
    pub fn is_active_on(&self, today: NaiveDate) -> bool {
        self.window().map_or(false, |w| w.contains(today))
    }
}

/// Derive required drone capabilities from mission skills.
///
/// Every keyword that appears (case-insensitively) inside a required skill is
/// required of the drone: "Thermal Inspection" requires "Thermal".
pub fn derive_capabilities<S: AsRef<str>>(skills: &TagSet, keywords: &[S]) -> TagSet {
    let mut required = TagSet::new();
    for skill in skills.iter() {
        let skill = skill.to_lowercase();
        for keyword in keywords {
            let keyword = keyword.as_ref();
            if !keyword.trim().is_empty() && skill.contains(&keyword.trim().to_lowercase()) {
                required.insert(keyword);
            }
        }
    }
    required
}
