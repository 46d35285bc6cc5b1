//! Error types for the irrigation engine.
//!
//! One enum per subsystem so each caller can match on exactly what it can
//! recover from:
//!
//! | Type               | Raised by                     | Handling                     |
//! |--------------------|-------------------------------|------------------------------|
//! | `TransactionError` | board exchanges (`link`)      | channel skip / non-fatal     |
//! | `PredictorError`   | model load and inference      | sentinel, or fatal at load   |
//! | `ConfigError`      | config file + validation      | fatal at startup             |
//! | `LogError`         | CSV record log                | reported, cycle continues    |
//! | `StartupError`     | orchestrator construction     | fatal, no cycles run         |

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Board transactions
// ---------------------------------------------------------------------------

/// A single command/response exchange against a board failed.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The transport could not be opened (missing device, permissions).
    #[error("cannot open {port}: {source}")]
    TransportOpen {
        port: String,
        #[source]
        source: io::Error,
    },

    /// Writing the command or reading the response failed mid-exchange.
    #[error("I/O error on {port}: {source}")]
    Io {
        port: String,
        #[source]
        source: io::Error,
    },

    /// No line arrived within the endpoint's response window.
    #[error("no data received from {port} for command '{command}' within {timeout:?}")]
    Timeout {
        port: String,
        command: String,
        timeout: Duration,
    },

    /// A line arrived but violated the response format.
    #[error("{port} returned malformed data ('{line}'): {fault}")]
    Format {
        port: String,
        line: String,
        fault: FormatFault,
    },
}

impl TransactionError {
    /// Port of the endpoint that failed.
    pub fn port(&self) -> &str {
        match self {
            Self::TransportOpen { port, .. }
            | Self::Io { port, .. }
            | Self::Timeout { port, .. }
            | Self::Format { port, .. } => port,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}

/// Why a response line was rejected by the codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatFault {
    #[error("{found} field(s), expected {expected}")]
    FieldCount { found: usize, expected: usize },

    #[error("field '{field}' is not a finite number")]
    NotNumeric { field: String },
}

// ---------------------------------------------------------------------------
// Predictor
// ---------------------------------------------------------------------------

/// The regression model could not be loaded or evaluated.
#[derive(Debug, Error)]
pub enum PredictorError {
    #[error("cannot read model file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("model file {} is malformed: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Parameter arrays do not line up with the feature vector.
    #[error("model shape mismatch: {0}")]
    Shape(String),

    /// A parameter or the prediction itself is NaN or infinite.
    #[error("model produced a non-finite value")]
    NonFinite,

    /// Inference attempted through a handle whose load failed.
    #[error("predictor not loaded: {0}")]
    Unready(String),
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("config {} is malformed: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A field failed range validation.  The message names the field.
    #[error("validation failed: {0}")]
    ValidationFailed(String),
}

// ---------------------------------------------------------------------------
// Record log
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LogError {
    #[error("record log {} unavailable: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

/// Conditions under which the engine refuses to run any cycle.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("stress model unavailable: {0}")]
    PredictorUnavailable(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
