//! # Command Runner
//!
//! Feeds parsed commands into an [`ItemStore`] and folds every answer into
//! a checksum.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  line ──► Command::parse ──► execute ──► checksum += answer            │
//! │                                  │                                      │
//! │                                  └──► verify_consistency (optional)    │
//! │                                                                         │
//! │  End / EOF ──► RunReport { result, operations, items, tags, ... }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::BufRead;
use std::time::Instant;

use mds_core::ItemStore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::command::Command;
use crate::config::{ReportFormat, RunSettings};
use crate::error::{DriverError, DriverResult};

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Wrapping sum of every command's answer.
    pub result: i64,

    /// Commands executed.
    pub operations: u64,

    /// Bad lines skipped (only when `stop_on_error` is off).
    pub skipped: u64,

    /// Items left in the store.
    pub items: usize,

    /// Distinct tags left in the index.
    pub tags: usize,

    /// Wall-clock time spent in `run`, in milliseconds.
    pub elapsed_ms: u64,
}

impl RunReport {
    /// Renders the report in the configured format.
    pub fn render(&self, format: ReportFormat) -> DriverResult<String> {
        match format {
            ReportFormat::Checksum => Ok(self.result.to_string()),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

/// Executes commands against one store.
#[derive(Debug, Default)]
pub struct Runner {
    store: ItemStore,
    settings: RunSettings,
    checksum: i64,
    operations: u64,
    skipped: u64,
}

impl Runner {
    /// Creates a runner over an empty store.
    pub fn new(settings: RunSettings) -> Self {
        Runner {
            settings,
            ..Default::default()
        }
    }

    /// Executes one command and returns its checksum contribution.
    ///
    /// Prices come back as cents, insert as 1 (new) or 0 (updated).
    pub fn execute(&mut self, command: &Command) -> i64 {
        let answer = match command {
            Command::Insert { id, price, tags } => self.store.insert(*id, *price, tags).flag(),
            Command::Find { id } => self.store.find(*id).cents(),
            Command::Delete { id } => self.store.delete(*id),
            Command::FindMinPrice { tag } => self.store.find_min_price(*tag).cents(),
            Command::FindMaxPrice { tag } => self.store.find_max_price(*tag).cents(),
            Command::FindPriceRange { tag, low, high } => {
                self.store.find_price_range(*tag, *low, *high)
            }
            Command::PriceHike {
                low_id,
                high_id,
                rate,
            } => self.store.price_hike(*low_id, *high_id, *rate).cents(),
            Command::RemoveNames { id, tags } => self.store.remove_names(*id, tags),
            Command::End => return 0,
        };

        self.checksum = self.checksum.wrapping_add(answer);
        self.operations += 1;
        answer
    }

    /// Runs every line of `input` until `End` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> DriverResult<RunReport> {
        let started = Instant::now();

        for (index, line) in input.lines().enumerate() {
            let line_no = index + 1;
            let line = line?;

            let command = match Command::parse(line_no, &line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(err) if !self.settings.stop_on_error => {
                    warn!(line = line_no, error = %err, "Skipping bad command");
                    self.skipped += 1;
                    continue;
                }
                Err(err) => return Err(err),
            };

            if command == Command::End {
                debug!(line = line_no, "End of commands");
                break;
            }

            let answer = self.execute(&command);
            debug!(line = line_no, command = command.name(), answer, "Executed");

            if self.settings.verify_invariants {
                self.store
                    .verify_consistency()
                    .map_err(|source| DriverError::Inconsistent {
                        line: line_no,
                        source,
                    })?;
            }
        }

        let report = self.report(started.elapsed().as_millis() as u64);
        info!(
            result = report.result,
            operations = report.operations,
            skipped = report.skipped,
            items = report.items,
            "Run complete"
        );
        Ok(report)
    }

    /// Current checksum.
    pub fn checksum(&self) -> i64 {
        self.checksum
    }

    /// The store being driven.
    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    fn report(&self, elapsed_ms: u64) -> RunReport {
        RunReport {
            result: self.checksum,
            operations: self.operations,
            skipped: self.skipped,
            items: self.store.len(),
            tags: self.store.tag_count(),
            elapsed_ms,
        }
    }
}
