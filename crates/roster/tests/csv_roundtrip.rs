//! Roster store tests against CSV files on disk

use fleetmatch_domain::{DroneStatus, PilotStatus};
use fleetmatch_roster::{CsvPaths, CsvSource, RosterError, RosterStore};
use std::fs;
use std::path::Path;

fn write_roster(dir: &Path) -> CsvPaths {
    let paths = CsvPaths::in_dir(dir);
    fs::write(
        &paths.pilots,
        "pilot_id,name,skills,certifications,location,status,current_assignment,available_from\n\
         P001,Arjun,\"Mapping, Survey\",\"DGCA, Night Ops\",Bangalore,Available,,2026-01-01\n\
         P002,Neha,Inspection,DGCA,Mumbai,Assigned,PRJ002,2026-01-01\n",
    )
    .unwrap();
    fs::write(
        &paths.drones,
        "drone_id,model,capabilities,status,location,current_assignment,maintenance_due\n\
         D001,DJI M300,\"LiDAR, RGB\",Available,Bangalore,,2026-06-01\n\
         D002,DJI Mavic 3T,Thermal,In Use,Mumbai,PRJ002,2026-04-01\n",
    )
    .unwrap();
    fs::write(
        &paths.missions,
        "project_id,client,location,required_skills,required_certs,start_date,end_date,priority\n\
         PRJ001,Client A,Bangalore,Mapping,DGCA,2026-02-06,2026-02-08,High\n\
         PRJ002,Client B,Mumbai,Thermal Inspection,DGCA,2026-02-01,2026-02-10,Standard\n",
    )
    .unwrap();
    paths
}

/// Updates written back to disk are visible after a reload from the same files
#[test]
fn test_update_export_reload() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_roster(dir.path());
    let mut store = RosterStore::load(CsvSource::new(paths.clone())).unwrap();

    store.apply_assignment("PRJ001", "P001", "D001").unwrap();
    store.write_csv(&paths).unwrap();

    let reloaded = RosterStore::load(CsvSource::new(paths)).unwrap();
    let pilot = reloaded.pilot("P001").unwrap();
    assert_eq!(pilot.status, PilotStatus::Assigned);
    assert_eq!(pilot.current_assignment.as_deref(), Some("PRJ001"));
    assert_eq!(reloaded.drone("D001").unwrap().status, DroneStatus::InUse);
    assert_eq!(reloaded.snapshot().fingerprint().unwrap(), store.snapshot().fingerprint().unwrap());
}

/// Thermal capability is derived from the mission's skills when no column names it
#[test]
fn test_capabilities_derived_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = RosterStore::load(CsvSource::new(write_roster(dir.path()))).unwrap();

    let mission = store.mission("PRJ002").unwrap();
    assert!(mission.required_capabilities.contains("thermal"));
    assert!(store.mission("PRJ001").unwrap().required_capabilities.is_empty());
}

/// A malformed date rejects the whole load and names the row
#[test]
fn test_malformed_date_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_roster(dir.path());
    fs::write(
        &paths.missions,
        "project_id,client,location,start_date,end_date\n\
         PRJ001,Client A,Bangalore,06/02/2026,2026-02-08\n",
    )
    .unwrap();

    let err = RosterStore::load(CsvSource::new(paths)).unwrap_err();
    match err {
        RosterError::InvalidDate { row, column, .. } => {
            assert_eq!(row, 2);
            assert_eq!(column, "start_date");
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// A failed reload keeps the previous snapshot in place
#[test]
fn test_failed_reload_keeps_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let paths = write_roster(dir.path());
    let mut store = RosterStore::load(CsvSource::new(paths.clone())).unwrap();

    fs::write(&paths.pilots, "name,status\nArjun,Available\n").unwrap();
    assert!(matches!(store.reload(), Err(RosterError::MissingColumn { .. })));
    assert_eq!(store.pilots().len(), 2);
}
