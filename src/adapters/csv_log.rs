//! CSV record log.
//!
//! ```text
//! Timestamp,Sensor Command,Moisture Reading %,Ambient Temperature C,Object Temperature C,CWSI[,Red Value,Green Value,Blue Value]
//! 2024-06-01 12:00:00,A,42.0,30.0,28.3,0.493
//! ```
//!
//! The header is written once, when the file is first created.  Each row
//! goes out in a single `write_all` on a file opened in append mode.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::app::ports::RecordSink;
use crate::config::{StressStrategy, SystemConfig};
use crate::error::LogError;
use crate::fsm::context::Rgb;
use crate::record::LogRecord;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const LINE_END: &str = "\r\n";

const BASE_COLUMNS: [&str; 5] = [
    "Timestamp",
    "Sensor Command",
    "Moisture Reading %",
    "Ambient Temperature C",
    "Object Temperature C",
];
const RGB_COLUMNS: [&str; 3] = ["Red Value", "Green Value", "Blue Value"];

/// Column set, fixed when the file is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    Basic,
    WithRgb,
}

pub struct CsvRecordLog {
    path: PathBuf,
    layout: CsvLayout,
    stress_label: &'static str,
}

impl CsvRecordLog {
    pub fn new(path: impl Into<PathBuf>, layout: CsvLayout, stress_label: &'static str) -> Self {
        Self {
            path: path.into(),
            layout,
            stress_label,
        }
    }

    /// RGB columns exactly when a camera is configured; the stress column
    /// is named after the strategy.
    pub fn for_config(config: &SystemConfig) -> Self {
        let layout = if config.boards.vision.is_some() {
            CsvLayout::WithRgb
        } else {
            CsvLayout::Basic
        };
        let stress_label = match config.stress {
            StressStrategy::Formula => "CWSI",
            StressStrategy::Model { .. } => "Predicted CWSI",
        };
        Self::new(config.log_path.clone(), layout, stress_label)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header(&self) -> String {
        let mut columns: Vec<&str> = BASE_COLUMNS.to_vec();
        columns.push(self.stress_label);
        if self.layout == CsvLayout::WithRgb {
            columns.extend(RGB_COLUMNS);
        }
        let mut line = columns.join(",");
        line.push_str(LINE_END);
        line
    }

    fn row(&self, record: &LogRecord) -> String {
        // Channel symbols are alphanumeric and every other field is
        // numeric, so no field ever needs quoting.
        let mut line = format!(
            "{},{},{:?},{:?},{:?},{}",
            record.timestamp.format(TIMESTAMP_FORMAT),
            record.channel,
            record.moisture_percent,
            record.ambient_c,
            record.object_c,
            record.stress,
        );
        if self.layout == CsvLayout::WithRgb {
            let Rgb { r, g, b } = record.rgb.unwrap_or(Rgb::ZERO);
            line.push_str(&format!(",{r},{g},{b}"));
        }
        line.push_str(LINE_END);
        line
    }

    fn io_error(&self, source: io::Error) -> LogError {
        LogError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl RecordSink for CsvRecordLog {
    fn initialize(&mut self) -> Result<bool, LogError> {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(mut file) => {
                file.write_all(self.header().as_bytes())
                    .map_err(|e| self.io_error(e))?;
                info!("Created record log {}", self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                info!("Appending to existing record log {}", self.path.display());
                Ok(false)
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// The file must already exist; a missing file is reported rather than
    /// recreated without its header.
    fn append(&mut self, record: &LogRecord) -> Result<(), LogError> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        file.write_all(self.row(record).as_bytes())
            .map_err(|e| self.io_error(e))
    }
}
