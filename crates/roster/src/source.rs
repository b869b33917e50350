//! Roster sources: CSV files and spreadsheet value grids

use crate::error::{Result, RosterError};
use crate::rows::{
    parse_drones, parse_missions, parse_pilots, DroneRecord, MissionRecord, ParseOptions,
    PilotRecord, RawTable,
};
use fleetmatch_core::DataConfig;
use fleetmatch_domain::{Drone, Mission, Pilot, RecordKind};
use serde::Serialize;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Typed tables produced by a source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterTables {
    pub pilots: Vec<Pilot>,
    pub drones: Vec<Drone>,
    pub missions: Vec<Mission>,
}

/// Anything the roster can be (re)loaded from
pub trait RosterSource {
    /// Read and validate all three tables
    fn load(&self) -> Result<RosterTables>;

    /// Short human-readable description ("csv:data/", "grid")
    fn describe(&self) -> String;
}

/// Paths of the three roster CSV files
#[derive(Debug, Clone, PartialEq)]
pub struct CsvPaths {
    pub pilots: PathBuf,
    pub drones: PathBuf,
    pub missions: PathBuf,
}

impl CsvPaths {
    /// Standard file names inside `dir`
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            pilots: dir.join("pilot_roster.csv"),
            drones: dir.join("drone_fleet.csv"),
            missions: dir.join("missions.csv"),
        }
    }

    pub fn from_config(config: &DataConfig) -> Self {
        Self {
            pilots: config.pilots_csv.clone(),
            drones: config.drones_csv.clone(),
            missions: config.missions_csv.clone(),
        }
    }
}

/// Loads the roster from three CSV files
#[derive(Debug, Clone)]
pub struct CsvSource {
    paths: CsvPaths,
    options: ParseOptions,
}

impl CsvSource {
    pub fn new(paths: CsvPaths) -> Self {
        Self {
            paths,
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn paths(&self) -> &CsvPaths {
        &self.paths
    }

    /// Read one file into a raw table. A missing file yields an empty table.
    fn read_table(table: RecordKind, path: &Path) -> Result<RawTable> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    table = %table,
                    path = %path.display(),
                    "Roster file not found, table left empty"
                );
                return Ok(RawTable::default());
            }
            Err(source) => {
                return Err(RosterError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows: Vec<(usize, Vec<String>)> = Vec::new();
        for record in reader.records() {
            let record = record?;
            // The reader skips blank lines, so take the position it reports
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(rows.len() + 2);
            rows.push((line, record.iter().map(str::to_string).collect()));
        }
        debug!(table = %table, path = %path.display(), rows = rows.len(), "Read roster file");
        Ok(RawTable::with_lines(headers, rows))
    }
}

impl RosterSource for CsvSource {
    fn load(&self) -> Result<RosterTables> {
        let pilots = parse_pilots(&Self::read_table(RecordKind::Pilot, &self.paths.pilots)?)?;
        let drones = parse_drones(&Self::read_table(RecordKind::Drone, &self.paths.drones)?)?;
        let missions = parse_missions(
            &Self::read_table(RecordKind::Mission, &self.paths.missions)?,
            &self.options,
        )?;
        Ok(RosterTables {
            pilots,
            drones,
            missions,
        })
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.paths.pilots.parent().unwrap_or(Path::new(".")).display())
    }
}

/// Loads the roster from in-memory value grids, the shape a spreadsheet
/// values API returns (first row is the header, every cell a string)
#[derive(Debug, Clone, Default)]
pub struct GridSource {
    pilots: Vec<Vec<String>>,
    drones: Vec<Vec<String>>,
    missions: Vec<Vec<String>>,
    options: ParseOptions,
}

impl GridSource {
    pub fn new(
        pilots: Vec<Vec<String>>,
        drones: Vec<Vec<String>>,
        missions: Vec<Vec<String>>,
    ) -> Self {
        Self {
            pilots,
            drones,
            missions,
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }
}

impl RosterSource for GridSource {
    fn load(&self) -> Result<RosterTables> {
        Ok(RosterTables {
            pilots: parse_pilots(&RawTable::from_grid(self.pilots.clone()))?,
            drones: parse_drones(&RawTable::from_grid(self.drones.clone()))?,
            missions: parse_missions(&RawTable::from_grid(self.missions.clone()), &self.options)?,
        })
    }

    fn describe(&self) -> String {
        "grid".to_string()
    }
}

fn write_records<T, R>(path: &Path, items: &[T]) -> Result<()>
where
    for<'a> R: From<&'a T> + Serialize,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| RosterError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for item in items {
        writer.serialize(R::from(item))?;
    }
    writer.flush().map_err(|source| RosterError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Write the three tables back to CSV, in the column layout the loader reads
pub fn write_csv(paths: &CsvPaths, tables: (&[Pilot], &[Drone], &[Mission])) -> Result<()> {
    let (pilots, drones, missions) = tables;
    write_records::<Pilot, PilotRecord>(&paths.pilots, pilots)?;
    write_records::<Drone, DroneRecord>(&paths.drones, drones)?;
    write_records::<Mission, MissionRecord>(&paths.missions, missions)?;
    Ok(())
}
