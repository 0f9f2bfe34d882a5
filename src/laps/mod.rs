pub mod accuracy;
pub mod loader;
pub mod numbering;

use serde::{Deserialize, Serialize};

pub use accuracy::{
    AccuracyCheck, AccuracyReport, DriverAccuracy, RecordedAccuracy, compute_accuracy,
};
pub use loader::{LapRecord, load_session_jsonl};
pub use numbering::{assign_lap_number, insert_crash_lap, renumber, validate_numbering};

use crate::PaddockError;

/// Whether the timing data recorded for a lap can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LapAccuracy {
    Accurate,
    Inaccurate,
    /// No verdict yet, or the check for this driver could not be completed
    #[default]
    Unknown,
}

impl std::fmt::Display for LapAccuracy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LapAccuracy::Accurate => write!(f, "Accurate"),
            LapAccuracy::Inaccurate => write!(f, "Inaccurate"),
            LapAccuracy::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A single circuit traversal by one driver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lap {
    /// Lap number, the first lap of a driver is 1
    pub number: u32,
    /// Recorded lap time, missing for generated laps and unfinished laps
    #[serde(default)]
    pub lap_time_s: Option<f32>,
    /// Set when the lap was synthesized rather than observed, e.g. for a crash
    #[serde(default)]
    pub generated: bool,
    #[serde(default)]
    pub accuracy: LapAccuracy,
}

impl Default for Lap {
    fn default() -> Self {
        Self {
            number: 1,
            lap_time_s: None,
            generated: false,
            accuracy: LapAccuracy::Unknown,
        }
    }
}

impl Lap {
    pub fn new(number: u32, lap_time_s: f32, accuracy: LapAccuracy) -> Self {
        Self {
            number,
            lap_time_s: Some(lap_time_s),
            generated: false,
            accuracy,
        }
    }

    /// A synthetic lap standing in for one that was never completed. The
    /// number is a placeholder until the lap is placed in a sequence.
    pub fn generated() -> Self {
        Self {
            generated: true,
            accuracy: LapAccuracy::Inaccurate,
            ..Default::default()
        }
    }
}

/// All laps of one driver in a session, in driving order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverLaps {
    pub driver: String,
    pub laps: Vec<Lap>,
}

impl DriverLaps {
    pub fn new(driver: impl Into<String>, laps: Vec<Lap>) -> Self {
        Self {
            driver: driver.into(),
            laps,
        }
    }

    pub fn lap(&self, number: u32) -> Option<&Lap> {
        self.laps.iter().find(|l| l.number == number)
    }

    pub fn lap_numbers(&self) -> Vec<u32> {
        self.laps.iter().map(|l| l.number).collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub name: String,
    pub drivers: Vec<DriverLaps>,
}

impl Session {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            drivers: Vec::new(),
        }
    }

    /// Add a driver's laps, replacing any laps already held for that driver
    pub fn with_driver(mut self, driver_laps: DriverLaps) -> Self {
        match self
            .drivers
            .iter_mut()
            .find(|d| d.driver == driver_laps.driver)
        {
            Some(existing) => *existing = driver_laps,
            None => self.drivers.push(driver_laps),
        }
        self
    }

    pub fn driver(&self, driver: &str) -> Option<&DriverLaps> {
        self.drivers.iter().find(|d| d.driver == driver)
    }

    pub fn driver_mut(&mut self, driver: &str) -> Result<&mut DriverLaps, PaddockError> {
        self.drivers
            .iter_mut()
            .find(|d| d.driver == driver)
            .ok_or_else(|| PaddockError::UnknownDriver {
                driver: driver.to_string(),
            })
    }

    pub fn lap_count(&self) -> usize {
        self.drivers.iter().map(|d| d.laps.len()).sum()
    }
}
