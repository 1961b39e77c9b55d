use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default acceptance threshold for fuzzy stem matching
pub const DEFAULT_FUZZY_CUTOFF: f64 = 0.78;

/// Log level for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Configuration for a replacement run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the "source of truth" images (searched recursively)
    pub reference_dir: PathBuf,

    /// Directory whose subfolders hold the images to be replaced
    pub target_dir: PathBuf,

    /// Whether to run without making changes
    pub dry_run: bool,

    /// Whether to copy each target aside before overwriting it
    pub make_backup: bool,

    /// Minimum similarity ratio for a fuzzy stem match (0.0-1.0)
    pub fuzzy_cutoff: f64,

    /// Log level
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_dir: PathBuf::from("website_image"),
            target_dir: PathBuf::from("assets/images"),
            dry_run: false,
            make_backup: true,
            fuzzy_cutoff: DEFAULT_FUZZY_CUTOFF,
            log_level: LogLevel::Info,
        }
    }
}

impl Config {
    /// Create a configuration for the given reference and target trees, defaults elsewhere
    pub fn new(reference_dir: impl Into<PathBuf>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            reference_dir: reference_dir.into(),
            target_dir: target_dir.into(),
            ..Default::default()
        }
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .map_err(|e| Error::Configuration(format!("Failed to open config file: {}", e)))?;

        let config: Config = serde_json::from_reader(file)
            .map_err(|e| Error::Configuration(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .map_err(|e| Error::Configuration(format!("Failed to create config file: {}", e)))?;

        serde_json::to_writer_pretty(file, self)
            .map_err(|e| Error::Configuration(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // NaN fails both comparisons
        if !(0.0..=1.0).contains(&self.fuzzy_cutoff) {
            return Err(Error::Configuration(format!(
                "Fuzzy cutoff must be between 0.0 and 1.0, got {}",
                self.fuzzy_cutoff
            )));
        }

        if !self.target_dir.is_dir() {
            return Err(Error::Configuration(format!(
                "Target directory does not exist or is not a directory: {}",
                self.target_dir.display()
            )));
        }

        Ok(())
    }
}
