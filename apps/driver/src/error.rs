//! # Driver Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CoreError (money/rate parse, validation, inconsistency)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DriverError (this module) ← adds the input line number                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  main() → stderr + non-zero exit                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use mds_core::CoreError;
use thiserror::Error;

/// Result type alias for driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

/// Driver errors.
#[derive(Debug, Error)]
pub enum DriverError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid driver configuration.
    #[error("Invalid driver configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Input Errors
    // =========================================================================
    /// A command line could not be parsed.
    #[error("Line {line}: {reason}")]
    Syntax { line: usize, reason: String },

    /// A command argument was rejected by the core.
    #[error("Line {line}: {source}")]
    Argument {
        line: usize,
        #[source]
        source: CoreError,
    },

    /// Reading input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // =========================================================================
    // Store Errors
    // =========================================================================
    /// The store failed its consistency check.
    #[error("Store check failed after line {line}: {source}")]
    Inconsistent {
        line: usize,
        #[source]
        source: CoreError,
    },

    /// Report serialization failed.
    #[error("Report serialization failed: {0}")]
    Report(#[from] serde_json::Error),
}

impl DriverError {
    /// Creates a Syntax error for a line.
    pub fn syntax(line: usize, reason: impl Into<String>) -> Self {
        DriverError::Syntax {
            line,
            reason: reason.into(),
        }
    }

    /// Returns the input line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            DriverError::Syntax { line, .. }
            | DriverError::Argument { line, .. }
            | DriverError::Inconsistent { line, .. } => Some(*line),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for DriverError {
    fn from(err: toml::de::Error) -> Self {
        DriverError::ConfigLoadFailed(err.to_string())
    }
}
