//! JSON configuration file adapter.
//!
//! A missing file is not an error: the rig runs on the built-in defaults
//! and says so.  A file that exists must parse and validate.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::ConfigPort;
use crate::config::SystemConfig;
use crate::error::ConfigError;

pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigPort for JsonConfigFile {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        let config = match fs::read_to_string(&self.path) {
            Ok(text) => {
                let config: SystemConfig =
                    serde_json::from_str(&text).map_err(|source| ConfigError::Malformed {
                        path: self.path.clone(),
                        source,
                    })?;
                info!("Loaded config from {}", self.path.display());
                config
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Config {} not found, using defaults", self.path.display());
                SystemConfig::default()
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        config.validate()?;
        Ok(config)
    }
}
