//! The per-channel log record.

use chrono::NaiveDateTime;

use crate::config::Channel;
use crate::control::stress::StressIndex;
use crate::fsm::context::Rgb;

/// One completed channel pass, as persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// Local wall-clock time the record was produced.
    pub timestamp: NaiveDateTime,
    pub channel: Channel,
    pub moisture_percent: f64,
    pub ambient_c: f64,
    pub object_c: f64,
    /// Sentinels are recorded verbatim.
    pub stress: StressIndex,
    pub rgb: Option<Rgb>,
}
