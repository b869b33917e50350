//! Row-level parsing shared by every roster source
//!
//! CSV files and spreadsheet value grids both arrive as a header row plus
//! string cells. Columns are matched by (case-insensitive) header name, so
//! column order is free and optional columns may be absent. Each row is
//! validated once here; the scoring engine only ever sees typed records.

use crate::error::{Result, RosterError};
use fleetmatch_domain::{
    derive_capabilities, parse_date, Drone, DroneStatus, DomainError, Mission, MissionPriority,
    Pilot, PilotStatus, RecordKind, TagSet, DATE_FORMAT,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::str::FromStr;

/// Options applied while turning rows into records
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOptions {
    /// Keywords used to derive required drone capabilities from mission skills
    pub capability_keywords: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::from_config(&fleetmatch_core::ScoringConfig::default())
    }
}

impl ParseOptions {
    pub fn from_config(config: &fleetmatch_core::ScoringConfig) -> Self {
        Self {
            capability_keywords: config.capability_keywords.clone(),
        }
    }
}

/// Header row plus string cells for one table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    lines: Vec<usize>,
}

impl RawTable {
    /// Rows numbered as if they followed the header with no gaps
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let lines: Vec<usize> = (2..rows.len() + 2).collect();
        Self {
            headers,
            rows,
            lines,
        }
    }

    /// Rows paired with the source line each one was read from
    pub fn with_lines(headers: Vec<String>, rows: Vec<(usize, Vec<String>)>) -> Self {
        let (lines, rows): (Vec<usize>, Vec<Vec<String>>) = rows.into_iter().unzip();
        Self {
            headers,
            rows,
            lines,
        }
    }

    /// Split a value grid whose first row is the header
    pub fn from_grid(mut grid: Vec<Vec<String>>) -> Self {
        if grid.is_empty() {
            return Self::default();
        }
        let headers = grid.remove(0);
        Self::new(headers, grid)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn column(&self, names: &[&str]) -> Option<usize> {
        self.headers.iter().position(|h| {
            let h = h.trim();
            names.iter().any(|n| h.eq_ignore_ascii_case(n))
        })
    }

    /// Rows that carry at least one non-blank cell, with their line numbers
    /// (header is line 1)
    fn data_rows(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.lines
            .iter()
            .zip(&self.rows)
            .filter(|(_, cells)| cells.iter().any(|c| !c.trim().is_empty()))
            .map(|(&line, cells)| (line, cells.as_slice()))
    }
}

struct Columns {
    table: RecordKind,
    indices: Vec<Option<usize>>,
    names: Vec<&'static str>,
}

impl Columns {
    /// Resolve each column spec (first alias is the canonical name)
    fn resolve(table: RecordKind, raw: &RawTable, specs: &[&[&'static str]]) -> Self {
        Self {
            table,
            indices: specs.iter().map(|aliases| raw.column(aliases)).collect(),
            names: specs.iter().map(|aliases| aliases[0]).collect(),
        }
    }

    fn require_column(&self, col: usize) -> Result<()> {
        if self.indices[col].is_none() {
            return Err(RosterError::MissingColumn {
                table: self.table,
                column: self.names[col],
            });
        }
        Ok(())
    }

    fn row<'a>(&'a self, line: usize, cells: &'a [String]) -> Row<'a> {
        Row {
            columns: self,
            line,
            cells,
        }
    }
}

struct Row<'a> {
    columns: &'a Columns,
    line: usize,
    cells: &'a [String],
}

impl<'a> Row<'a> {
    /// Trimmed cell, `None` when the column is absent or the cell is blank
    fn get(&self, col: usize) -> Option<&'a str> {
        let idx = self.columns.indices[col]?;
        let cell = self.cells.get(idx)?.trim();
        (!cell.is_empty()).then_some(cell)
    }

    fn require(&self, col: usize) -> Result<&'a str> {
        self.get(col).ok_or(RosterError::MissingField {
            table: self.columns.table,
            row: self.line,
            column: self.columns.names[col],
        })
    }

    fn text(&self, col: usize) -> String {
        self.get(col).unwrap_or_default().to_string()
    }

    fn tags(&self, col: usize) -> TagSet {
        self.get(col).map(TagSet::parse_list).unwrap_or_default()
    }

    fn date(&self, col: usize) -> Result<Option<NaiveDate>> {
        match self.get(col) {
            None => Ok(None),
            Some(value) => parse_date(value).map(Some).map_err(|_| RosterError::InvalidDate {
                table: self.columns.table,
                row: self.line,
                column: self.columns.names[col],
                value: value.to_string(),
            }),
        }
    }

    fn required_date(&self, col: usize) -> Result<NaiveDate> {
        self.require(col)?;
        self.date(col)?.ok_or(RosterError::MissingField {
            table: self.columns.table,
            row: self.line,
            column: self.columns.names[col],
        })
    }

    fn parse_or<T>(&self, col: usize, default: T) -> Result<T>
    where
        T: FromStr<Err = DomainError>,
    {
        match self.get(col) {
            None => Ok(default),
            Some(value) => value.parse().map_err(|_| RosterError::InvalidField {
                table: self.columns.table,
                row: self.line,
                column: self.columns.names[col],
                value: value.to_string(),
            }),
        }
    }
}

const PILOT_COLUMNS: &[&[&str]] = &[
    &["pilot_id", "id"],
    &["name"],
    &["skills"],
    &["certifications", "certs"],
    &["location"],
    &["status"],
    &["current_assignment", "assignment"],
    &["available_from"],
];

/// Parse the pilot roster table
pub fn parse_pilots(raw: &RawTable) -> Result<Vec<Pilot>> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    let cols = Columns::resolve(RecordKind::Pilot, raw, PILOT_COLUMNS);
    cols.require_column(0)?;

    raw.data_rows()
        .map(|(line, cells)| -> Result<Pilot> {
            let row = cols.row(line, cells);
            Ok(Pilot {
                id: row.require(0)?.to_string(),
                name: row.text(1),
                skills: row.tags(2),
                certifications: row.tags(3),
                location: row.text(4),
                status: row.parse_or(5, PilotStatus::Available)?,
                current_assignment: row.get(6).map(str::to_string),
                available_from: row.date(7)?,
            })
        })
        .collect()
}

const DRONE_COLUMNS: &[&[&str]] = &[
    &["drone_id", "id"],
    &["model"],
    &["capabilities"],
    &["status"],
    &["location"],
    &["current_assignment", "assignment"],
    &["maintenance_due"],
];

/// Parse the drone fleet table
pub fn parse_drones(raw: &RawTable) -> Result<Vec<Drone>> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    let cols = Columns::resolve(RecordKind::Drone, raw, DRONE_COLUMNS);
    cols.require_column(0)?;

    raw.data_rows()
        .map(|(line, cells)| -> Result<Drone> {
            let row = cols.row(line, cells);
            Ok(Drone {
                id: row.require(0)?.to_string(),
                model: row.text(1),
                capabilities: row.tags(2),
                status: row.parse_or(3, DroneStatus::Available)?,
                location: row.text(4),
                current_assignment: row.get(5).map(str::to_string),
                maintenance_due: row.date(6)?,
            })
        })
        .collect()
}

const MISSION_COLUMNS: &[&[&str]] = &[
    &["project_id", "mission_id", "id"],
    &["client"],
    &["location"],
    &["required_skills"],
    &["required_certs", "required_certifications"],
    &["start_date"],
    &["end_date"],
    &["priority"],
    &["required_capabilities"],
];

/// Parse the missions table.
///
/// When `required_capabilities` is absent or blank, the set is derived from
/// the required skills via `options.capability_keywords`.
pub fn parse_missions(raw: &RawTable, options: &ParseOptions) -> Result<Vec<Mission>> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    let cols = Columns::resolve(RecordKind::Mission, raw, MISSION_COLUMNS);
    for col in [0, 5, 6] {
        cols.require_column(col)?;
    }

    raw.data_rows()
        .map(|(line, cells)| -> Result<Mission> {
            let row = cols.row(line, cells);
            let required_skills = row.tags(3);
            let required_capabilities = match row.get(8) {
                Some(cell) => TagSet::parse_list(cell),
                None => derive_capabilities(&required_skills, &options.capability_keywords),
            };
            Ok(Mission {
                id: row.require(0)?.to_string(),
                client: row.text(1),
                location: row.text(2),
                required_skills,
                required_certs: row.tags(4),
                required_capabilities,
                start_date: row.required_date(5)?,
                end_date: row.required_date(6)?,
                priority: row.parse_or(7, MissionPriority::Standard)?,
            })
        })
        .collect()
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Pilot row as written back to CSV
#[derive(Debug, Serialize)]
pub(crate) struct PilotRecord {
    pilot_id: String,
    name: String,
    skills: String,
    certifications: String,
    location: String,
    status: String,
    current_assignment: String,
    available_from: String,
}

impl From<&Pilot> for PilotRecord {
    fn from(p: &Pilot) -> Self {
        Self {
            pilot_id: p.id.clone(),
            name: p.name.clone(),
            skills: p.skills.to_list(),
            certifications: p.certifications.to_list(),
            location: p.location.clone(),
            status: p.status.to_string(),
            current_assignment: p.current_assignment.clone().unwrap_or_default(),
            available_from: format_date(p.available_from),
        }
    }
}

/// Drone row as written back to CSV
#[derive(Debug, Serialize)]
pub(crate) struct DroneRecord {
    drone_id: String,
    model: String,
    capabilities: String,
    status: String,
    location: String,
    current_assignment: String,
    maintenance_due: String,
}

impl From<&Drone> for DroneRecord {
    fn from(d: &Drone) -> Self {
        Self {
            drone_id: d.id.clone(),
            model: d.model.clone(),
            capabilities: d.capabilities.to_list(),
            status: d.status.to_string(),
            location: d.location.clone(),
            current_assignment: d.current_assignment.clone().unwrap_or_default(),
            maintenance_due: format_date(d.maintenance_due),
        }
    }
}

/// Mission row as written back to CSV
#[derive(Debug, Serialize)]
pub(crate) struct MissionRecord {
    project_id: String,
    client: String,
    location: String,
    required_skills: String,
    required_certs: String,
    start_date: String,
    end_date: String,
    priority: String,
    required_capabilities: String,
}

impl From<&Mission> for MissionRecord {
    fn from(m: &Mission) -> Self {
        Self {
            project_id: m.id.clone(),
            client: m.client.clone(),
            location: m.location.clone(),
            required_skills: m.required_skills.to_list(),
            required_certs: m.required_certs.to_list(),
            start_date: format_date(Some(m.start_date)),
            end_date: format_date(Some(m.end_date)),
            priority: m.priority.to_string(),
            required_capabilities: m.required_capabilities.to_list(),
        }
    }
}
