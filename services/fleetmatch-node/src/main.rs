//! FleetMatch node - roster operations from the command line
//!
//! ## Commands
//!
//! - `status`: roster totals and snapshot fingerprint
//! - `pilots` / `drones` / `missions`: list roster tables
//! - `assign`: rank pilot/drone pairings for a mission
//! - `conflicts`: scan the roster for conflicts
//! - `update-pilot` / `update-drone` / `release`: edit the roster and write it back
//! - `export`: write the roster to another directory

mod render;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use fleetmatch_core::{logging, Config, LogFormat};
use fleetmatch_domain::{DroneStatus, PilotStatus};
use fleetmatch_roster::{
    CsvPaths, CsvSource, DroneFilter, ParseOptions, PilotFilter, RosterStats, RosterStore,
};
use fleetmatch_scoring::{ConflictScanner, FeasibilityScorer};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

const NODE_RUNTIME_VERSION: u32 = 1;
/// Bumped whenever the CSV column layout changes
const ROSTER_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
struct NodeVersionHandshake {
    version: &'static str,
    runtime_version: u32,
    schema_version: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "fleetmatch-node")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pilot and drone assignment with conflict detection", long_about = None)]
struct Cli {
    /// Print the version handshake as JSON and exit
    #[arg(long)]
    version_json: bool,

    /// TOML configuration file
    #[arg(short, long, env = "FLEETMATCH_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Directory holding pilot_roster.csv, drone_fleet.csv and missions.csv
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show roster totals
    Status {
        /// Evaluation date (default: today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// List pilots
    Pilots {
        /// Only pilots with status Available
        #[arg(long)]
        available: bool,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        skill: Option<String>,
    },

    /// List drones
    Drones {
        /// Only drones with status Available
        #[arg(long)]
        available: bool,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        capability: Option<String>,
    },

    /// List missions
    Missions,

    /// Rank pilot/drone pairings for a mission
    Assign {
        /// Mission id
        mission: String,

        /// Show every pairing, not only recommended ones
        #[arg(long)]
        all: bool,

        /// Commit the best recommended pairing and write the roster back
        #[arg(long, conflicts_with = "all")]
        apply: bool,
    },

    /// Scan the roster for conflicts
    Conflicts {
        /// Evaluation date (default: today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Set a pilot's status and assignment
    UpdatePilot {
        id: String,

        #[arg(long)]
        status: PilotStatus,

        /// Mission id, required with status Assigned
        #[arg(long)]
        assignment: Option<String>,
    },

    /// Set a drone's status and assignment
    UpdateDrone {
        id: String,

        #[arg(long)]
        status: DroneStatus,

        /// Mission id, required with status "In Use"
        #[arg(long)]
        assignment: Option<String>,
    },

    /// Return every pilot and drone on a mission to Available
    Release {
        mission: String,
    },

    /// Write the roster as CSV files into a directory
    Export {
        dir: PathBuf,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Status { today: None }
    }
}

#[derive(Serialize)]
struct StatusView {
    #[serde(flatten)]
    stats: RosterStats,
    fingerprint: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.version_json {
        let handshake = NodeVersionHandshake {
            version: env!("CARGO_PKG_VERSION"),
            runtime_version: NODE_RUNTIME_VERSION,
            schema_version: ROSTER_SCHEMA_VERSION,
        };
        println!("{}", serde_json::to_string(&handshake)?);
        return Ok(());
    }

    let config = load_config(&cli)?;
    if cli.log_json {
        logging::init_with_format(LogFormat::Json);
    } else {
        logging::init_with_format(config.logging.format);
    }

    let (mut store, paths) = open_store(&config)?;
    run(cli.command.unwrap_or_default(), &mut store, &config, &paths, cli.format)
}

/// Config file (or defaults), then environment, then `--data-dir`
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config =
        Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(dir) = &cli.data_dir {
        let paths = CsvPaths::in_dir(dir);
        config.data.pilots_csv = paths.pilots;
        config.data.drones_csv = paths.drones;
        config.data.missions_csv = paths.missions;
    }
    Ok(config)
}

fn open_store(config: &Config) -> Result<(RosterStore, CsvPaths)> {
    let paths = CsvPaths::from_config(&config.data);
    let source = CsvSource::new(paths.clone())
        .with_options(ParseOptions::from_config(&config.scoring));
    let store = RosterStore::load(source).context("failed to load roster")?;
    Ok((store, paths))
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn emit<T: Serialize>(
    format: OutputFormat,
    value: &T,
    text: impl FnOnce() -> String,
) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => print!("{}", text()),
    }
    Ok(())
}

fn run(
    command: Commands,
    store: &mut RosterStore,
    config: &Config,
    paths: &CsvPaths,
    format: OutputFormat,
) -> Result<()> {
    match command {
        Commands::Status { today } => {
            let view = StatusView {
                stats: store.stats(today.unwrap_or_else(local_today)),
                fingerprint: store.snapshot().fingerprint()?,
            };
            emit(format, &view, || render::status(&view.stats, &view.fingerprint))
        }

        Commands::Pilots {
            available,
            location,
            skill,
        } => {
            let filter = PilotFilter {
                status: available.then_some(PilotStatus::Available),
                location,
                skill,
                ..Default::default()
            };
            let pilots = store.filter_pilots(&filter);
            emit(format, &pilots, || render::pilots(&pilots))
        }

        Commands::Drones {
            available,
            location,
            capability,
        } => {
            let filter = DroneFilter {
                status: available.then_some(DroneStatus::Available),
                location,
                capability,
            };
            let drones = store.filter_drones(&filter);
            emit(format, &drones, || render::drones(&drones))
        }

        Commands::Missions => {
            let missions = store.missions();
            emit(format, &missions, || render::missions(missions))
        }

        Commands::Assign { mission, all, apply } => {
            let snapshot = store.snapshot();
            let Some(target) = snapshot.mission(&mission) else {
                bail!("unknown mission {}", mission);
            };
            let scorer = FeasibilityScorer::from_config(&config.scoring);
            let results = if all {
                scorer.score_candidates(&snapshot, target, snapshot.pilots(), snapshot.drones())
            } else {
                scorer.recommend(&snapshot, target, snapshot.pilots(), snapshot.drones())
            };
            emit(format, &results, || render::feasibility(target, &results))?;

            if apply {
                let Some(best) = results.first() else {
                    bail!("no recommended pairing for mission {}", mission);
                };
                store.apply_assignment(&best.mission_id, &best.pilot_id, &best.drone_id)?;
                store.write_csv(paths)?;
                info!(
                    mission = %mission,
                    pilot = %best.pilot_id,
                    drone = %best.drone_id,
                    "Best pairing committed"
                );
            }
            Ok(())
        }

        Commands::Conflicts { today } => {
            let today = today.unwrap_or_else(local_today);
            let report =
                ConflictScanner::from_config(&config.scoring).scan(&store.snapshot(), today);
            emit(format, &report, || render::conflicts(&report))
        }

        Commands::UpdatePilot {
            id,
            status,
            assignment,
        } => {
            store.update_pilot_status(&id, status, assignment)?;
            store.write_csv(paths)?;
            let pilot = store.pilot(&id).context("pilot vanished after update")?;
            emit(format, pilot, || render::pilots(&[pilot]))
        }

        Commands::UpdateDrone {
            id,
            status,
            assignment,
        } => {
            store.update_drone_status(&id, status, assignment)?;
            store.write_csv(paths)?;
            let drone = store.drone(&id).context("drone vanished after update")?;
            emit(format, drone, || render::drones(&[drone]))
        }

        Commands::Release { mission } => {
            let released = store.release_mission(&mission)?;
            store.write_csv(paths)?;
            let summary = serde_json::json!({ "mission": mission, "released": released });
            emit(format, &summary, || format!("Released {} record(s) from {}\n", released, mission))
        }

        Commands::Export { dir } => {
            let target = CsvPaths::in_dir(&dir);
            store.write_csv(&target)?;
            let summary = serde_json::json!({
                "directory": dir,
                "pilots": store.pilots().len(),
                "drones": store.drones().len(),
                "missions": store.missions().len(),
            });
            emit(format, &summary, || format!("Exported roster to {}\n", dir.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn create_test_roster() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let paths = CsvPaths::in_dir(dir.path());
        fs::write(
            &paths.pilots,
            "pilot_id,name,skills,certifications,location,status,current_assignment,available_from\n\
             P001,Arjun,Mapping,DGCA,Bangalore,Available,,2026-01-01\n",
        )
        .unwrap();
        fs::write(
            &paths.drones,
            "drone_id,model,capabilities,status,location,current_assignment,maintenance_due\n\
             D001,DJI M300,\"LiDAR, RGB\",Available,Bangalore,,2026-06-01\n",
        )
        .unwrap();
        fs::write(
            &paths.missions,
            "project_id,client,location,required_skills,required_certs,start_date,end_date,priority\n\
             PRJ001,Client A,Bangalore,Mapping,DGCA,2026-02-06,2026-02-08,High\n",
        )
        .unwrap();
        dir
    }

    fn parse(data_dir: &Path, args: &[&str]) -> Cli {
        let mut argv: Vec<OsString> = vec!["fleetmatch-node".into(), "--data-dir".into()];
        argv.push(data_dir.into());
        argv.extend(args.iter().map(OsString::from));
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_data_dir_overrides_config_paths() {
        let roster = create_test_roster();
        let config_file = roster.path().join("fleetmatch.toml");
        fs::write(
            &config_file,
            "[data]\n\
             pilots_csv = \"elsewhere/pilots.csv\"\n\
             [scoring]\n\
             feasibility_threshold = 70\n",
        )
        .unwrap();
        let config_arg = config_file.to_string_lossy().into_owned();

        let cli = parse(roster.path(), &["--config", &config_arg, "missions"]);
        let config = load_config(&cli).unwrap();

        assert_eq!(config.data.pilots_csv, roster.path().join("pilot_roster.csv"));
        assert_eq!(config.data.missions_csv, roster.path().join("missions.csv"));
        assert_eq!(config.scoring.feasibility_threshold, 70);
    }

    #[test]
    fn test_status_is_default_command() {
        let roster = create_test_roster();
        let cli = parse(roster.path(), &["--format", "json"]);
        assert!(cli.command.is_none());

        let config = load_config(&cli).unwrap();
        let (mut store, paths) = open_store(&config).unwrap();
        assert_eq!(store.pilots().len(), 1);

        let command = cli.command.unwrap_or_default();
        assert!(matches!(command, Commands::Status { today: None }));
        run(command, &mut store, &config, &paths, cli.format).unwrap();
    }

    #[test]
    fn test_assign_apply_writes_roster_back() {
        let roster = create_test_roster();
        let cli = parse(roster.path(), &["assign", "PRJ001", "--apply"]);
        let config = load_config(&cli).unwrap();
        let (mut store, paths) = open_store(&config).unwrap();

        let command = cli.command.unwrap_or_default();
        run(command, &mut store, &config, &paths, cli.format).unwrap();

        let (reloaded, _) = open_store(&config).unwrap();
        let pilot = reloaded.pilot("P001").unwrap();
        assert_eq!(pilot.status, PilotStatus::Assigned);
        assert_eq!(pilot.current_assignment.as_deref(), Some("PRJ001"));
        let drone = reloaded.drone("D001").unwrap();
        assert_eq!(drone.status, DroneStatus::InUse);
    }

    #[test]
    fn test_assign_apply_rejects_unknown_mission() {
        let roster = create_test_roster();
        let cli = parse(roster.path(), &["assign", "PRJ404", "--apply"]);
        let config = load_config(&cli).unwrap();
        let (mut store, paths) = open_store(&config).unwrap();

        let err = run(cli.command.unwrap(), &mut store, &config, &paths, cli.format).unwrap_err();
        assert!(err.to_string().contains("unknown mission PRJ404"));
        let argv = ["fleetmatch-node", "assign", "PRJ001", "--all", "--apply"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
