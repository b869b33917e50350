//! Roster store
//!
//! Owns the current [`RosterSnapshot`] and the source it was loaded from.
//! Every load or field update builds a new snapshot and swaps the `Arc`, so
//! a scoring call holding the previous snapshot keeps a consistent view.

use crate::error::{Result, RosterError};
use crate::source::{write_csv, CsvPaths, RosterSource, RosterTables};
use chrono::{DateTime, NaiveDate, Utc};
use fleetmatch_domain::{
    locations_match, Drone, DroneStatus, Mission, Pilot, PilotStatus, RosterSnapshot,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Pilot query; unset fields match everything
#[derive(Debug, Clone, Default)]
pub struct PilotFilter {
    pub status: Option<PilotStatus>,
    pub location: Option<String>,
    pub skill: Option<String>,
    pub certification: Option<String>,
}

impl PilotFilter {
    pub fn matches(&self, pilot: &Pilot) -> bool {
        self.status.map_or(true, |s| pilot.status == s)
            && self
                .location
                .as_deref()
                .map_or(true, |l| locations_match(&pilot.location, l))
            && self.skill.as_deref().map_or(true, |s| pilot.skills.contains(s))
            && self
                .certification
                .as_deref()
                .map_or(true, |c| pilot.certifications.contains(c))
    }
}

/// Drone query; unset fields match everything
#[derive(Debug, Clone, Default)]
pub struct DroneFilter {
    pub status: Option<DroneStatus>,
    pub location: Option<String>,
    pub capability: Option<String>,
}

impl DroneFilter {
    pub fn matches(&self, drone: &Drone) -> bool {
        self.status.map_or(true, |s| drone.status == s)
            && self
                .location
                .as_deref()
                .map_or(true, |l| locations_match(&drone.location, l))
            && self
                .capability
                .as_deref()
                .map_or(true, |c| drone.capabilities.contains(c))
    }
}

/// Operational summary of the roster
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterStats {
    pub total_pilots: usize,
    pub available_pilots: usize,
    pub total_drones: usize,
    pub available_drones: usize,
    pub total_missions: usize,
    /// Missions whose window contains `today`
    pub active_missions: usize,
    pub last_sync: Option<DateTime<Utc>>,
    pub data_source: String,
}

/// In-memory roster tables with snapshot hand-out and field-level updates
pub struct RosterStore {
    source: Option<Box<dyn RosterSource>>,
    snapshot: Arc<RosterSnapshot>,
    last_sync: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for RosterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RosterStore")
            .field("source", &self.data_source())
            .field("pilots", &self.snapshot.pilots().len())
            .field("drones", &self.snapshot.drones().len())
            .field("missions", &self.snapshot.missions().len())
            .field("last_sync", &self.last_sync)
            .finish()
    }
}

impl RosterStore {
    /// Load the roster from `source`, keeping the source for [`reload`](Self::reload)
    pub fn load<S: RosterSource + 'static>(source: S) -> Result<Self> {
        let mut store = Self {
            source: Some(Box::new(source)),
            snapshot: Arc::new(RosterSnapshot::empty()),
            last_sync: None,
        };
        store.reload()?;
        Ok(store)
    }

    /// Wrap an existing snapshot with no backing source
    pub fn from_snapshot(snapshot: RosterSnapshot) -> Self {
        Self {
            source: None,
            snapshot: Arc::new(snapshot),
            last_sync: None,
        }
    }

    /// Re-read every table from the source. On failure the current snapshot
    /// is kept.
    pub fn reload(&mut self) -> Result<()> {
        let source = self.source.as_ref().ok_or(RosterError::NoSource)?;
        let RosterTables {
            pilots,
            drones,
            missions,
        } = source.load()?;
        info!(
            source = %source.describe(),
            pilots = pilots.len(),
            drones = drones.len(),
            missions = missions.len(),
            "Roster loaded"
        );
        self.replace(pilots, drones, missions);
        self.last_sync = Some(self.snapshot.taken_at());
        Ok(())
    }

    fn replace(&mut self, pilots: Vec<Pilot>, drones: Vec<Drone>, missions: Vec<Mission>) {
        let snapshot = RosterSnapshot::new(pilots, drones, missions);
        for dup in snapshot.duplicate_ids() {
            warn!(table = %dup.kind, id = %dup.id, count = dup.count, "Duplicate record id");
        }
        self.snapshot = Arc::new(snapshot);
    }

    /// Current snapshot; cheap to clone and safe to hold across updates
    pub fn snapshot(&self) -> Arc<RosterSnapshot> {
        Arc::clone(&self.snapshot)
    }

    pub fn pilots(&self) -> &[Pilot] {
        self.snapshot.pilots()
    }

    pub fn drones(&self) -> &[Drone] {
        self.snapshot.drones()
    }

    pub fn missions(&self) -> &[Mission] {
        self.snapshot.missions()
    }

    pub fn pilot(&self, id: &str) -> Option<&Pilot> {
        self.snapshot.pilot(id)
    }

    pub fn drone(&self, id: &str) -> Option<&Drone> {
        self.snapshot.drone(id)
    }

    pub fn mission(&self, id: &str) -> Option<&Mission> {
        self.snapshot.mission(id)
    }

    pub fn filter_pilots(&self, filter: &PilotFilter) -> Vec<&Pilot> {
        self.pilots().iter().filter(|p| filter.matches(p)).collect()
    }

    pub fn filter_drones(&self, filter: &DroneFilter) -> Vec<&Drone> {
        self.drones().iter().filter(|d| filter.matches(d)).collect()
    }

    pub fn available_pilots(&self) -> Vec<&Pilot> {
        self.filter_pilots(&PilotFilter {
            status: Some(PilotStatus::Available),
            ..Default::default()
        })
    }

    pub fn available_drones(&self) -> Vec<&Drone> {
        self.filter_drones(&DroneFilter {
            status: Some(DroneStatus::Available),
            ..Default::default()
        })
    }

    fn check_mission(&self, assignment: Option<&str>) -> Result<()> {
        match assignment {
            Some(id) if self.mission(id).is_none() => {
                Err(RosterError::UnknownMission(id.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Set a pilot's status and assignment.
    ///
    /// `Assigned` requires an assignment naming a known mission; every other
    /// status clears the assignment and rejects one being passed.
    pub fn update_pilot_status(
        &mut self,
        pilot_id: &str,
        status: PilotStatus,
        assignment: Option<String>,
    ) -> Result<()> {
        if self.pilot(pilot_id).is_none() {
            return Err(RosterError::UnknownPilot(pilot_id.to_string()));
        }
        match (status, assignment.as_deref()) {
            (PilotStatus::Assigned, None) => {
                return Err(RosterError::InvalidUpdate(format!(
                    "pilot {} cannot be Assigned without a mission",
                    pilot_id
                )))
            }
            (PilotStatus::Assigned, _) => {}
            (other, Some(mission)) => {
                return Err(RosterError::InvalidUpdate(format!(
                    "pilot {} with status {} cannot hold mission {}",
                    pilot_id, other, mission
                )))
            }
            (_, None) => {}
        }
        self.check_mission(assignment.as_deref())?;

        let (mut pilots, drones, missions) = self.snapshot.to_tables();
        for pilot in pilots.iter_mut().filter(|p| p.id == pilot_id) {
            pilot.status = status;
            pilot.current_assignment = assignment.clone();
        }
        info!(pilot = pilot_id, status = %status, assignment = ?assignment, "Pilot updated");
        self.replace(pilots, drones, missions);
        Ok(())
    }

    /// Set a drone's status and assignment.
    ///
    /// `In Use` requires an assignment naming a known mission; every other
    /// status clears the assignment and rejects one being passed.
    pub fn update_drone_status(
        &mut self,
        drone_id: &str,
        status: DroneStatus,
        assignment: Option<String>,
    ) -> Result<()> {
        if self.drone(drone_id).is_none() {
            return Err(RosterError::UnknownDrone(drone_id.to_string()));
        }
        match (status, assignment.as_deref()) {
            (DroneStatus::InUse, None) => {
                return Err(RosterError::InvalidUpdate(format!(
                    "drone {} cannot be In Use without a mission",
                    drone_id
                )))
            }
            (DroneStatus::InUse, _) => {}
            (other, Some(mission)) => {
                return Err(RosterError::InvalidUpdate(format!(
                    "drone {} with status {} cannot hold mission {}",
                    drone_id, other, mission
                )))
            }
            (_, None) => {}
        }
        self.check_mission(assignment.as_deref())?;

        let (pilots, mut drones, missions) = self.snapshot.to_tables();
        for drone in drones.iter_mut().filter(|d| d.id == drone_id) {
            drone.status = status;
            drone.current_assignment = assignment.clone();
        }
        info!(drone = drone_id, status = %status, assignment = ?assignment, "Drone updated");
        self.replace(pilots, drones, missions);
        Ok(())
    }

    /// Commit a pilot and drone to a mission (pilot `Assigned`, drone `In Use`).
    ///
    /// Feasibility is not re-checked here; callers score first.
    pub fn apply_assignment(
        &mut self,
        mission_id: &str,
        pilot_id: &str,
        drone_id: &str,
    ) -> Result<()> {
        if self.mission(mission_id).is_none() {
            return Err(RosterError::UnknownMission(mission_id.to_string()));
        }
        if self.pilot(pilot_id).is_none() {
            return Err(RosterError::UnknownPilot(pilot_id.to_string()));
        }
        if self.drone(drone_id).is_none() {
            return Err(RosterError::UnknownDrone(drone_id.to_string()));
        }

        let (mut pilots, mut drones, missions) = self.snapshot.to_tables();
        for pilot in pilots.iter_mut().filter(|p| p.id == pilot_id) {
            pilot.status = PilotStatus::Assigned;
            pilot.current_assignment = Some(mission_id.to_string());
        }
        for drone in drones.iter_mut().filter(|d| d.id == drone_id) {
            drone.status = DroneStatus::InUse;
            drone.current_assignment = Some(mission_id.to_string());
        }
        info!(mission = mission_id, pilot = pilot_id, drone = drone_id, "Assignment applied");
        self.replace(pilots, drones, missions);
        Ok(())
    }

    /// Return every pilot and drone on `mission_id` to `Available`.
    ///
    /// Returns the number of records released.
    pub fn release_mission(&mut self, mission_id: &str) -> Result<usize> {
        if self.mission(mission_id).is_none() {
            return Err(RosterError::UnknownMission(mission_id.to_string()));
        }

        let (mut pilots, mut drones, missions) = self.snapshot.to_tables();
        let mut released = 0;
        for pilot in pilots.iter_mut().filter(|p| p.is_assigned_to(mission_id)) {
            pilot.status = PilotStatus::Available;
            pilot.current_assignment = None;
            released += 1;
        }
        for drone in drones.iter_mut().filter(|d| d.is_assigned_to(mission_id)) {
            drone.status = DroneStatus::Available;
            drone.current_assignment = None;
            released += 1;
        }
        info!(mission = mission_id, released, "Mission released");
        self.replace(pilots, drones, missions);
        Ok(released)
    }

    /// Write the current tables to CSV files
    pub fn write_csv(&self, paths: &CsvPaths) -> Result<()> {
        write_csv(paths, (self.pilots(), self.drones(), self.missions()))?;
        info!(pilots = %paths.pilots.display(), "Roster exported");
        Ok(())
    }

    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        self.last_sync
    }

    /// Where the tables came from
    pub fn data_source(&self) -> String {
        self.source
            .as_ref()
            .map_or_else(|| "snapshot".to_string(), |s| s.describe())
    }

    pub fn stats(&self, today: NaiveDate) -> RosterStats {
        RosterStats {
            total_pilots: self.pilots().len(),
            available_pilots: self.pilots().iter().filter(|p| p.is_available()).count(),
            total_drones: self.drones().len(),
            available_drones: self.drones().iter().filter(|d| d.is_available()).count(),
            total_missions: self.missions().len(),
            active_missions: self.missions().iter().filter(|m| m.is_active_on(today)).count(),
            last_sync: self.last_sync,
            data_source: self.data_source(),
        }
    }
}
