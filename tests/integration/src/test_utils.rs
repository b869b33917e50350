//! Test utilities for roster integration tests

use chrono::NaiveDate;
use fleetmatch_domain::parse_date;
use fleetmatch_roster::{CsvPaths, CsvSource, GridSource, RosterStore};
use std::fs;
use std::sync::Once;
use tempfile::TempDir;

/// Pilot roster fixture: Arjun and Rohit free, Neha on PRJ002, Meera on leave
pub const PILOTS_CSV: &str = "\
pilot_id,name,skills,certifications,location,status,current_assignment,available_from
P001,Arjun,\"Mapping, Survey\",\"DGCA, Night Ops\",Bangalore,Available,,2026-01-01
P002,Neha,\"Inspection, Thermal\",DGCA,Mumbai,Assigned,PRJ002,2026-01-01
P003,Rohit,\"Inspection, Mapping\",DGCA,Mumbai,Available,,2026-01-15
P004,Meera,\"Survey, Thermal\",\"DGCA, Night Ops\",Bangalore,On Leave,,2026-03-01
";

/// Drone fleet fixture: D001 and D004 free, D002 on PRJ002, D003 grounded
pub const DRONES_CSV: &str = "\
drone_id,model,capabilities,status,location,current_assignment,maintenance_due
D001,DJI M300,\"LiDAR, RGB\",Available,Bangalore,,2026-06-01
D002,DJI Mavic 3T,\"Thermal, RGB\",In Use,Mumbai,PRJ002,2026-05-01
D003,DJI Mini 4 Pro,RGB,Maintenance,Bangalore,,2026-02-01
D004,Autel EVO II,\"Thermal, RGB\",Available,Mumbai,,2026-07-01
";

/// Missions fixture: PRJ001 and PRJ002 overlap, PRJ003 follows in Mumbai
pub const MISSIONS_CSV: &str = "\
project_id,client,location,required_skills,required_certs,start_date,end_date,priority
PRJ001,Client A,Bangalore,Mapping,DGCA,2026-02-06,2026-02-08,High
PRJ002,Client B,Mumbai,\"Inspection, Thermal\",DGCA,2026-02-01,2026-02-10,Standard
PRJ003,Client C,Mumbai,Inspection,DGCA,2026-02-14,2026-02-16,Urgent
";

static TRACING: Once = Once::new();

/// Install a test subscriber once; output is captured by the test harness
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("debug")
            .try_init();
    });
}

/// Parse a `YYYY-MM-DD` literal
pub fn date(value: &str) -> NaiveDate {
    parse_date(value).expect("valid test date")
}

/// Roster CSV files in a temporary directory
pub struct TestRoster {
    pub dir: TempDir,
    pub paths: CsvPaths,
}

impl TestRoster {
    /// Write the standard fixture
    pub fn new() -> Self {
        Self::with_tables(PILOTS_CSV, DRONES_CSV, MISSIONS_CSV)
    }

    /// Write custom table contents
    pub fn with_tables(pilots: &str, drones: &str, missions: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let paths = CsvPaths::in_dir(dir.path());
        fs::write(&paths.pilots, pilots).expect("write pilots");
        fs::write(&paths.drones, drones).expect("write drones");
        fs::write(&paths.missions, missions).expect("write missions");
        Self { dir, paths }
    }

    /// Load a store backed by the fixture files
    pub fn store(&self) -> RosterStore {
        init_tracing();
        RosterStore::load(CsvSource::new(self.paths.clone())).expect("load roster")
    }
}

impl Default for TestRoster {
    fn default() -> Self {
        Self::new()
    }
}

/// The standard fixture as a value-grid source
pub fn grid_source() -> GridSource {
    GridSource::new(to_grid(PILOTS_CSV), to_grid(DRONES_CSV), to_grid(MISSIONS_CSV))
}

/// Split CSV text into rows of cells, header first
fn to_grid(text: &str) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(text.as_bytes())
        .records()
        .map(|record| {
            record
                .expect("valid fixture csv")
                .iter()
                .map(str::to_string)
                .collect()
        })
        .collect()
}
