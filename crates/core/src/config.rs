//! Configuration management for FleetMatch.
//!
//! Configuration is read from a TOML file, then selectively overridden by
//! environment variables for the roster paths.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the pilot roster path.
pub const PILOTS_CSV_ENV: &str = "PILOTS_CSV_PATH";
/// Environment variable overriding the drone fleet path.
pub const DRONES_CSV_ENV: &str = "DRONES_CSV_PATH";
/// Environment variable overriding the missions path.
pub const MISSIONS_CSV_ENV: &str = "MISSIONS_CSV_PATH";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Locations of the three roster tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    #[serde(default = "default_pilots_csv")]
    pub pilots_csv: PathBuf,
    #[serde(default = "default_drones_csv")]
    pub drones_csv: PathBuf,
    #[serde(default = "default_missions_csv")]
    pub missions_csv: PathBuf,
}

/// Tunables for the feasibility scorer and conflict scanner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringConfig {
    /// Minimum score (inclusive) for a pairing to be recommended
    #[serde(default = "default_feasibility_threshold")]
    pub feasibility_threshold: u8,
    /// Upper bound on alternatives attached to each high-severity conflict
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    /// Lookahead window for the imminent incomplete mission rule
    #[serde(default = "default_imminent_days")]
    pub imminent_days: i64,
    /// Keywords mapping mission skills onto drone capabilities
    #[serde(default = "default_capability_keywords")]
    pub capability_keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

fn default_pilots_csv() -> PathBuf {
    PathBuf::from("data/pilot_roster.csv")
}

fn default_drones_csv() -> PathBuf {
    PathBuf::from("data/drone_fleet.csv")
}

fn default_missions_csv() -> PathBuf {
    PathBuf::from("data/missions.csv")
}

fn default_feasibility_threshold() -> u8 {
    50
}

fn default_max_suggestions() -> usize {
    3
}

fn default_imminent_days() -> i64 {
    3
}

fn default_capability_keywords() -> Vec<String> {
    ["Thermal", "LiDAR", "RGB", "Hyperspectral", "4K"]
        .iter()
        .map(|k| k.to_string())
        .collect()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            pilots_csv: default_pilots_csv(),
            drones_csv: default_drones_csv(),
            missions_csv: default_missions_csv(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            feasibility_threshold: default_feasibility_threshold(),
            max_suggestions: default_max_suggestions(),
            imminent_days: default_imminent_days(),
            capability_keywords: default_capability_keywords(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    #[cfg(feature = "toml")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| CoreError::Parse(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load from `path` when given, otherwise start from defaults; then apply
    /// environment overrides.
    #[cfg(feature = "toml")]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Override roster paths from `PILOTS_CSV_PATH`, `DRONES_CSV_PATH` and
    /// `MISSIONS_CSV_PATH` when set.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(PILOTS_CSV_ENV).filter(|v| !v.is_empty()) {
            self.data.pilots_csv = PathBuf::from(path);
        }
        if let Some(path) = lookup(DRONES_CSV_ENV).filter(|v| !v.is_empty()) {
            self.data.drones_csv = PathBuf::from(path);
        }
        if let Some(path) = lookup(MISSIONS_CSV_ENV).filter(|v| !v.is_empty()) {
            self.data.missions_csv = PathBuf::from(path);
        }
    }

    /// Reject values the scorer cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.scoring.feasibility_threshold > 100 {
            return Err(CoreError::Config(format!(
                "feasibility_threshold must be within 0..=100, got {}",
                self.scoring.feasibility_threshold
            )));
        }
        if self.scoring.imminent_days <= 0 {
            return Err(CoreError::Config(format!(
                "imminent_days must be positive, got {}",
                self.scoring.imminent_days
            )));
        }
        Ok(())
    }
}
