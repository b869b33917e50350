//! Immutable roster snapshots
//!
//! A snapshot is the consistent view of all three tables that a scoring or
//! scan call works against. The roster layer builds a fresh snapshot after
//! every load or update; nothing mutates one in place.

use crate::error::{DomainError, Result};
use crate::model::{Drone, Mission, Pilot};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Table a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Pilot,
    Drone,
    Mission,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Pilot => "pilot",
            RecordKind::Drone => "drone",
            RecordKind::Mission => "mission",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An id that appears more than once in a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateRecord {
    pub kind: RecordKind,
    pub id: String,
    /// Number of rows sharing the id
    pub count: usize,
}

#[derive(Serialize)]
struct Tables<'a> {
    pilots: &'a [Pilot],
    drones: &'a [Drone],
    missions: &'a [Mission],
}

/// Point-in-time view of pilots, drones and missions
#[derive(Debug, Clone)]
pub struct RosterSnapshot {
    pilots: Vec<Pilot>,
    drones: Vec<Drone>,
    missions: Vec<Mission>,
    taken_at: DateTime<Utc>,
    /// First row index per id
    pilot_index: HashMap<String, usize>,
    drone_index: HashMap<String, usize>,
    mission_index: HashMap<String, usize>,
}

fn first_index<'a, I>(ids: I) -> HashMap<String, usize>
where
    I: Iterator<Item = &'a str>,
{
    let mut index = HashMap::new();
    for (i, id) in ids.enumerate() {
        index.entry(id.to_string()).or_insert(i);
    }
    index
}

impl RosterSnapshot {
    /// Build a snapshot stamped with the current time
    pub fn new(pilots: Vec<Pilot>, drones: Vec<Drone>, missions: Vec<Mission>) -> Self {
        Self::at(pilots, drones, missions, Utc::now())
    }

    /// Build a snapshot with an explicit timestamp
    pub fn at(
        pilots: Vec<Pilot>,
        drones: Vec<Drone>,
        missions: Vec<Mission>,
        taken_at: DateTime<Utc>,
    ) -> Self {
        let pilot_index = first_index(pilots.iter().map(|p| p.id.as_str()));
        let drone_index = first_index(drones.iter().map(|d| d.id.as_str()));
        let mission_index = first_index(missions.iter().map(|m| m.id.as_str()));
        Self {
            pilots,
            drones,
            missions,
            taken_at,
            pilot_index,
            drone_index,
            mission_index,
        }
    }

    /// Snapshot with no records
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), Vec::new())
    }

    pub fn pilots(&self) -> &[Pilot] {
        &self.pilots
    }

    pub fn drones(&self) -> &[Drone] {
        &self.drones
    }

    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    pub fn pilot(&self, id: &str) -> Option<&Pilot> {
        self.pilot_index.get(id).map(|&i| &self.pilots[i])
    }

    pub fn drone(&self, id: &str) -> Option<&Drone> {
        self.drone_index.get(id).map(|&i| &self.drones[i])
    }

    pub fn mission(&self, id: &str) -> Option<&Mission> {
        self.mission_index.get(id).map(|&i| &self.missions[i])
    }

    /// Look up a mission or fail with `UnknownEntity`
    pub fn require_mission(&self, id: &str) -> Result<&Mission> {
        self.mission(id).ok_or_else(|| DomainError::UnknownEntity {
            kind: "mission",
            id: id.to_string(),
        })
    }

    /// Pilots whose current assignment is `mission_id`
    pub fn pilots_assigned_to<'a>(
        &'a self,
        mission_id: &'a str,
    ) -> impl Iterator<Item = &'a Pilot> {
        self.pilots.iter().filter(move |p| p.is_assigned_to(mission_id))
    }

    /// Drones whose current assignment is `mission_id`
    pub fn drones_assigned_to<'a>(
        &'a self,
        mission_id: &'a str,
    ) -> impl Iterator<Item = &'a Drone> {
        self.drones.iter().filter(move |d| d.is_assigned_to(mission_id))
    }

    /// Ids shared by more than one row, per table, in first-seen order
    pub fn duplicate_ids(&self) -> Vec<DuplicateRecord> {
        fn scan<'a>(
            kind: RecordKind,
            ids: impl Iterator<Item = &'a str>,
            out: &mut Vec<DuplicateRecord>,
        ) {
            let mut counts: Vec<(&str, usize)> = Vec::new();
            for id in ids {
                match counts.iter_mut().find(|(seen, _)| *seen == id) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((id, 1)),
                }
            }
            out.extend(
                counts
                    .into_iter()
                    .filter(|(_, count)| *count > 1)
                    .map(|(id, count)| DuplicateRecord {
                        kind,
                        id: id.to_string(),
                        count,
                    }),
            );
        }

        let mut out = Vec::new();
        scan(RecordKind::Pilot, self.pilots.iter().map(|p| p.id.as_str()), &mut out);
        scan(RecordKind::Drone, self.drones.iter().map(|d| d.id.as_str()), &mut out);
        scan(RecordKind::Mission, self.missions.iter().map(|m| m.id.as_str()), &mut out);
        out
    }

    /// BLAKE3 digest (hex) of the canonical JSON of the three tables.
    ///
    /// The timestamp is excluded: two snapshots with identical records have
    /// the same fingerprint.
    pub fn fingerprint(&self) -> Result<String> {
        let tables = Tables {
            pilots: &self.pilots,
            drones: &self.drones,
            missions: &self.missions,
        };
        let canonical = serde_json::to_vec(&tables)
            .map_err(|e| DomainError::SerializationError(e.to_string()))?;
        Ok(hex::encode(blake3::hash(&canonical).as_bytes()))
    }

    /// Copy of the tables, for building the next snapshot
    pub fn to_tables(&self) -> (Vec<Pilot>, Vec<Drone>, Vec<Mission>) {
        (self.pilots.clone(), self.drones.clone(), self.missions.clone())
    }
}

impl Default for RosterSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DroneStatus, MissionPriority, PilotStatus};
    use crate::schedule::parse_date;
    use crate::tags::TagSet;

    fn create_test_pilot(id: &str, assignment: Option<&str>) -> Pilot {
        Pilot {
            id: id.to_string(),
            name: format!("Pilot {}", id),
            skills: TagSet::parse_list("Mapping"),
            certifications: TagSet::parse_list("DGCA"),
            location: "Bangalore".to_string(),
            status: if assignment.is_some() {
                PilotStatus::Assigned
            } else {
                PilotStatus::Available
            },
            current_assignment: assignment.map(str::to_string),
            available_from: Some(parse_date("2026-01-01").unwrap()),
        }
    }

    fn create_test_drone(id: &str, assignment: Option<&str>) -> Drone {
        Drone {
            id: id.to_string(),
            model: "DJI M300".to_string(),
            capabilities: TagSet::parse_list("RGB"),
            status: DroneStatus::Available,
            location: "Bangalore".to_string(),
            current_assignment: assignment.map(str::to_string),
            maintenance_due: None,
        }
    }

    fn create_test_mission(id: &str) -> Mission {
        Mission {
            id: id.to_string(),
            client: "Client".to_string(),
            location: "Bangalore".to_string(),
            required_skills: TagSet::new(),
            required_certs: TagSet::new(),
            required_capabilities: TagSet::new(),
            start_date: parse_date("2026-02-06").unwrap(),
            end_date: parse_date("2026-02-08").unwrap(),
            priority: MissionPriority::Standard,
        }
    }

    #[test]
    fn test_lookup_by_id() {
        let snapshot = RosterSnapshot::new(
            vec![create_test_pilot("P001", Some("PRJ001")), create_test_pilot("P002", None)],
            vec![create_test_drone("D001", Some("PRJ001"))],
            vec![create_test_mission("PRJ001")],
        );

        assert_eq!(snapshot.pilot("P002").unwrap().id, "P002");
        assert!(snapshot.drone("D999").is_none());
        assert!(snapshot.require_mission("PRJ001").is_ok());
        assert!(matches!(
            snapshot.require_mission("PRJ404"),
            Err(DomainError::UnknownEntity { kind: "mission", .. })
        ));
        assert_eq!(snapshot.pilots_assigned_to("PRJ001").count(), 1);
        assert_eq!(snapshot.drones_assigned_to("PRJ001").count(), 1);
        assert_eq!(snapshot.drones_assigned_to("PRJ002").count(), 0);
    }

    #[test]
    fn test_duplicate_lookup_returns_first_row() {
        let mut second = create_test_pilot("P001", None);
        second.name = "Shadow".to_string();
        let snapshot = RosterSnapshot::new(
            vec![create_test_pilot("P001", None), second],
            vec![],
            vec![
                create_test_mission("PRJ001"),
                create_test_mission("PRJ001"),
                create_test_mission("PRJ001"),
            ],
        );

        assert_eq!(snapshot.pilot("P001").unwrap().name, "Pilot P001");
        let dups = snapshot.duplicate_ids();
        assert_eq!(dups.len(), 2);
        assert_eq!(
            dups[0],
            DuplicateRecord {
                kind: RecordKind::Pilot,
                id: "P001".into(),
                count: 2
            }
        );
        assert_eq!(dups[1].kind, RecordKind::Mission);
        assert_eq!(dups[1].count, 3);
    }

    #[test]
    fn test_fingerprint_ignores_timestamp() {
        let build = || {
            RosterSnapshot::new(
                vec![create_test_pilot("P001", None)],
                vec![create_test_drone("D001", None)],
                vec![create_test_mission("PRJ001")],
            )
        };
        let a = build();
        let b = build();
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_eq!(a.fingerprint().unwrap().len(), 64);

        let (mut pilots, drones, missions) = a.to_tables();
        pilots[0].status = PilotStatus::OnLeave;
        let changed = RosterSnapshot::new(pilots, drones, missions);
        assert_ne!(changed.fingerprint().unwrap(), a.fingerprint().unwrap());
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = RosterSnapshot::default();
        assert!(snapshot.pilots().is_empty());
        assert!(snapshot.duplicate_ids().is_empty());
    }
}
