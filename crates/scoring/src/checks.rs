//! Rule checks
//!
//! Seven independent predicates over a (mission, pilot, drone) triple. Each
//! returns `None` on pass and a [`ConflictFinding`] on failure. The pilot and
//! drone availability checks also look up the resource's current assignment
//! in the snapshot to detect overlapping bookings.

use crate::findings::{CheckKind, ConflictFinding};
use fleetmatch_domain::{
    locations_match, DateRange, Drone, DroneStatus, Mission, Pilot, PilotStatus, RosterSnapshot,
    DATE_FORMAT,
};

/// Check 1: the pilot holds every required skill
pub fn check_skills(mission: &Mission, pilot: &Pilot) -> Option<ConflictFinding> {
    let missing = mission.required_skills.missing_from(&pilot.skills);
    if missing.is_empty() {
        return None;
    }
    Some(
        ConflictFinding::new(
            CheckKind::SkillMismatch,
            format!("Pilot missing skills: {}", missing.join(", ")),
        )
        .with_mission(&mission.id)
        .with_pilot(&pilot.id),
    )
}

/// Check 2: the pilot holds every required certification
pub fn check_certifications(mission: &Mission, pilot: &Pilot) -> Option<ConflictFinding> {
    let missing = mission.required_certs.missing_from(&pilot.certifications);
    if missing.is_empty() {
        return None;
    }
    Some(
        ConflictFinding::new(
            CheckKind::CertificationMismatch,
            format!("Pilot missing certifications: {}", missing.join(", ")),
        )
        .with_mission(&mission.id)
        .with_pilot(&pilot.id),
    )
}

/// Check 3: the pilot is based at the mission location
pub fn check_pilot_location(mission: &Mission, pilot: &Pilot) -> Option<ConflictFinding> {
    if locations_match(&pilot.location, &mission.location) {
        return None;
    }
    Some(
        ConflictFinding::new(
            CheckKind::PilotLocationMismatch,
            format!("Location mismatch: {} vs {}", pilot.location, mission.location),
        )
        .with_mission(&mission.id)
        .with_pilot(&pilot.id),
    )
}

/// Reasons the pilot cannot fly `mission` regardless of other bookings
fn pilot_readiness_issues(mission: &Mission, pilot: &Pilot) -> Vec<String> {
    let mut issues = Vec::new();
    if pilot.status == PilotStatus::OnLeave {
        issues.push(format!("Pilot status: {}", pilot.status));
    }
    match pilot.available_from {
        None => issues.push("Pilot availability date unknown".to_string()),
        Some(from) if mission.start_date < from => issues.push(format!(
            "Pilot available {}, mission starts {}",
            from.format(DATE_FORMAT),
            mission.start_date.format(DATE_FORMAT)
        )),
        Some(_) => {}
    }
    issues
}

/// Window of the other mission `assignment` names, when it overlaps `window`
fn overlapping_booking<'a>(
    snapshot: &'a RosterSnapshot,
    mission: &Mission,
    window: Option<DateRange>,
    assignment: Option<&str>,
) -> Option<&'a Mission> {
    let window = window?;
    let other_id = assignment.filter(|id| *id != mission.id)?;
    let other = snapshot.mission(other_id)?;
    other
        .window()
        .filter(|other_window| other_window.overlaps(&window))
        .map(|_| other)
}

fn unavailable_pilot(
    mission: &Mission,
    pilot: &Pilot,
    issues: Vec<String>,
) -> Option<ConflictFinding> {
    if issues.is_empty() {
        return None;
    }
    Some(
        ConflictFinding::new(CheckKind::PilotUnavailable, issues.join("; "))
            .with_mission(&mission.id)
            .with_pilot(&pilot.id),
    )
}

/// Check 4 in its existing-assignment form: on leave, or an unknown or late
/// availability date. Used by the scanner for pilots already on `mission`.
pub fn check_pilot_readiness(mission: &Mission, pilot: &Pilot) -> Option<ConflictFinding> {
    unavailable_pilot(mission, pilot, pilot_readiness_issues(mission, pilot))
}

/// Check 4: the pilot can fly the whole mission window.
///
/// Fails when the pilot is on leave, has no known availability date, becomes
/// available after the mission starts, or is booked on another mission whose
/// window overlaps. The overlap test is skipped when either window is invalid.
pub fn check_pilot_availability(
    snapshot: &RosterSnapshot,
    mission: &Mission,
    pilot: &Pilot,
) -> Option<ConflictFinding> {
    let mut issues = pilot_readiness_issues(mission, pilot);
    if let Some(other) = overlapping_booking(
        snapshot,
        mission,
        mission.window(),
        pilot.current_assignment.as_deref(),
    ) {
        issues.push(format!("Pilot already assigned to overlapping mission {}", other.id));
    }
    unavailable_pilot(mission, pilot, issues)
}

fn unavailable_drone(
    mission: &Mission,
    drone: &Drone,
    issues: Vec<String>,
) -> Option<ConflictFinding> {
    if issues.is_empty() {
        return None;
    }
    Some(
        ConflictFinding::new(CheckKind::DroneUnavailable, issues.join("; "))
            .with_mission(&mission.id)
            .with_drone(&drone.id),
    )
}

fn drone_readiness_issues(drone: &Drone) -> Vec<String> {
    if drone.status != DroneStatus::Maintenance {
        return Vec::new();
    }
    let due = drone
        .maintenance_due
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "unknown".to_string());
    vec![format!("Drone status: {}. Maintenance due: {}", drone.status, due)]
}

/// Check 5 in its existing-assignment form: the drone is in maintenance
pub fn check_drone_readiness(mission: &Mission, drone: &Drone) -> Option<ConflictFinding> {
    unavailable_drone(mission, drone, drone_readiness_issues(drone))
}

/// Check 5: the drone is serviceable and not booked on an overlapping mission
pub fn check_drone_availability(
    snapshot: &RosterSnapshot,
    mission: &Mission,
    drone: &Drone,
) -> Option<ConflictFinding> {
    let mut issues = drone_readiness_issues(drone);
    if let Some(other) = overlapping_booking(
        snapshot,
        mission,
        mission.window(),
        drone.current_assignment.as_deref(),
    ) {
        issues.push(format!("Drone already assigned to overlapping mission {}", other.id));
    }
    unavailable_drone(mission, drone, issues)
}

/// Check 6: the drone carries every required capability
pub fn check_capabilities(mission: &Mission, drone: &Drone) -> Option<ConflictFinding> {
    let missing = mission.required_capabilities.missing_from(&drone.capabilities);
    if missing.is_empty() {
        return None;
    }
    Some(
        ConflictFinding::new(
            CheckKind::CapabilityMismatch,
            format!("Drone missing capabilities: {}", missing.join(", ")),
        )
        .with_mission(&mission.id)
        .with_drone(&drone.id),
    )
}

/// Check 7: the drone is based at the mission location
pub fn check_drone_location(mission: &Mission, drone: &Drone) -> Option<ConflictFinding> {
    if locations_match(&drone.location, &mission.location) {
        return None;
    }
    Some(
        ConflictFinding::new(
            CheckKind::DroneLocationMismatch,
            format!("Drone location mismatch: {} vs {}", drone.location, mission.location),
        )
        .with_mission(&mission.id)
        .with_drone(&drone.id),
    )
}

/// Data-quality finding for a mission that ends before it starts
pub fn check_mission_window(mission: &Mission) -> Option<ConflictFinding> {
    if mission.window().is_some() {
        return None;
    }
    Some(
        ConflictFinding::new(
            CheckKind::InvalidDateRange,
            format!(
                "Mission ends {} before it starts {}",
                mission.end_date.format(DATE_FORMAT),
                mission.start_date.format(DATE_FORMAT)
            ),
        )
        .with_mission(&mission.id),
    )
}

/// Run all seven checks in order, without short-circuiting.
///
/// An invalid mission window adds an `InvalidDateRange` finding after the
/// seven checks.
pub fn run_all(
    snapshot: &RosterSnapshot,
    mission: &Mission,
    pilot: &Pilot,
    drone: &Drone,
) -> Vec<ConflictFinding> {
    [
        check_skills(mission, pilot),
        check_certifications(mission, pilot),
        check_pilot_location(mission, pilot),
        check_pilot_availability(snapshot, mission, pilot),
        check_drone_availability(snapshot, mission, drone),
        check_capabilities(mission, drone),
        check_drone_location(mission, drone),
        check_mission_window(mission),
    ]
    .into_iter()
    .flatten()
    .collect()
}
