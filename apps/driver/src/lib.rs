//! # mds-driver: Command-File Driver
//!
//! Reads a line-oriented command file, runs each command against an
//! [`mds_core::ItemStore`] and reports a checksum of all answers.
//!
//! ## Modules
//!
//! - [`command`] - Parsing one line into a [`Command`]
//! - [`runner`] - Executing commands and building the [`RunReport`]
//! - [`config`] - `DriverConfig` (TOML file + `MDS_*` environment)
//! - [`error`] - Driver error types
//!
//! ## Example
//!
//! ```rust
//! use mds_driver::{RunSettings, Runner};
//!
//! let input = "Insert 1 5.00 10 20 0\nFind 1\nEnd\n";
//! let report = Runner::new(RunSettings::default()).run(input.as_bytes()).unwrap();
//! assert_eq!(report.result, 1 + 500);
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod runner;

pub use command::Command;
pub use config::{DriverConfig, LogSettings, ReportFormat, RunSettings};
pub use error::{DriverError, DriverResult};
pub use runner::{RunReport, Runner};
