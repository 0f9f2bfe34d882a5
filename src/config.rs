use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{PaddockError, laps::LapAccuracy, laps::RecordedAccuracy};

const CONFIG_DIR_NAME: &str = "paddock";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Generated laps are never trusted, regardless of their recorded flag
    pub generated_laps_inaccurate: bool,
    /// Verdict given to every lap of a driver whose accuracy check failed
    pub failure_verdict: LapAccuracy,
    pub schedule_dir: Option<PathBuf>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            generated_laps_inaccurate: true,
            failure_verdict: LapAccuracy::Unknown,
            schedule_dir: None,
        }
    }
}

impl ValidatorConfig {
    pub fn default_path() -> Result<PathBuf, PaddockError> {
        Ok(dirs::config_dir()
            .ok_or(PaddockError::NoConfigDir)?
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }

    pub fn from_local_file() -> Result<Option<Self>, PaddockError> {
        Self::from_path(&Self::default_path()?)
    }

    pub fn from_path(config_path: &Path) -> Result<Option<Self>, PaddockError> {
        if !config_path.exists() {
            debug!("No config file at {:?}, using defaults", config_path);
            return Ok(None);
        }
        let file = std::fs::File::open(config_path)
            .map_err(|e| PaddockError::ConfigIOError { source: e })?;
        serde_json::from_reader(file)
            .map(Some)
            .map_err(|e| PaddockError::ConfigSerializeError { source: e })
    }

    pub fn save(&self) -> Result<(), PaddockError> {
        self.save_to(&Self::default_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<(), PaddockError> {
        if let Some(parent) = config_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| PaddockError::ConfigIOError { source: e })?;
            }
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| PaddockError::ConfigIOError { source: e })?;
        serde_json::to_writer_pretty(file, self)
            .map_err(|e| PaddockError::ConfigSerializeError { source: e })
    }

    pub fn accuracy_check(&self) -> RecordedAccuracy {
        RecordedAccuracy {
            generated_laps_inaccurate: self.generated_laps_inaccurate,
        }
    }
}
