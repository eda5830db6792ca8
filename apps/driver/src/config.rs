//! # Driver Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MDS_REPORT=json                                                    │
//! │     MDS_VERIFY_INVARIANTS=true                                         │
//! │     MDS_STOP_ON_ERROR=false                                            │
//! │     MDS_LOG=debug                                                      │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or the platform config dir:                       │
//! │     ~/.config/mds/driver.toml (Linux)                                  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # driver.toml
//! [run]
//! report = "checksum"        # checksum | json
//! verify_invariants = false  # full store check after every command
//! stop_on_error = true       # false: log bad lines and keep going
//!
//! [log]
//! filter = "info,mds=debug"
//! ```
//!
//! `RUST_LOG`, when set, takes precedence over `[log] filter`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{DriverError, DriverResult};

// =============================================================================
// Report Format
// =============================================================================

/// How the run result is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// The accumulated checksum on one line.
    #[default]
    Checksum,

    /// A JSON object with checksum, counts and timing.
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Checksum => write!(f, "checksum"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = DriverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "checksum" | "result" => Ok(ReportFormat::Checksum),
            "json" => Ok(ReportFormat::Json),
            other => Err(DriverError::InvalidConfig(format!(
                "Unknown report format: '{}'. Valid options: checksum, json",
                other
            ))),
        }
    }
}

// =============================================================================
// Settings
// =============================================================================

/// Run behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSettings {
    /// Output format of the final report.
    #[serde(default)]
    pub report: ReportFormat,

    /// Run the full table/index check after every command.
    #[serde(default)]
    pub verify_invariants: bool,

    /// Abort on the first bad line instead of skipping it.
    #[serde(default = "default_true")]
    pub stop_on_error: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RunSettings {
    fn default() -> Self {
        RunSettings {
            report: ReportFormat::default(),
            verify_invariants: false,
            stop_on_error: default_true(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directive.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,mds=debug".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Driver Configuration
// =============================================================================

/// Complete driver configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Run settings.
    #[serde(default)]
    pub run: RunSettings,

    /// Logging settings.
    #[serde(default)]
    pub log: LogSettings,
}

impl DriverConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (driver.toml)
    /// 3. Environment variables
    ///
    /// An explicitly given path must exist; the platform default may not.
    pub fn load(config_path: Option<PathBuf>) -> DriverResult<Self> {
        let mut config = Self::default();

        let explicit = config_path.is_some();
        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading driver config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else if explicit {
                return Err(DriverError::ConfigLoadFailed(format!(
                    "config file not found: {}",
                    path.display()
                )));
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document.
    pub fn from_toml(contents: &str) -> DriverResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> DriverResult<()> {
        if self.log.filter.trim().is_empty() {
            return Err(DriverError::InvalidConfig(
                "log filter must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies `MDS_*` overrides from a variable lookup.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(report) = lookup("MDS_REPORT") {
            match report.parse() {
                Ok(parsed) => {
                    debug!(report = %report, "Overriding report format from environment");
                    self.run.report = parsed;
                }
                Err(_) => warn!(report = %report, "Unknown report format in environment"),
            }
        }

        if let Some(verify) = lookup("MDS_VERIFY_INVARIANTS") {
            match parse_flag(&verify) {
                Some(v) => self.run.verify_invariants = v,
                None => warn!(value = %verify, "MDS_VERIFY_INVARIANTS is not a boolean"),
            }
        }

        if let Some(stop) = lookup("MDS_STOP_ON_ERROR") {
            match parse_flag(&stop) {
                Some(v) => self.run.stop_on_error = v,
                None => warn!(value = %stop, "MDS_STOP_ON_ERROR is not a boolean"),
            }
        }

        if let Some(filter) = lookup("MDS_LOG") {
            self.log.filter = filter;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "mds", "mds")
            .map(|dirs| dirs.config_dir().join("driver.toml"))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
