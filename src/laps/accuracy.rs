use std::panic::{self, AssertUnwindSafe};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{DriverLaps, Lap, LapAccuracy, Session, validate_numbering};
use crate::PaddockError;

/// Decides the accuracy of every lap of a single driver.
///
/// A check only ever sees one driver's laps and must return exactly one
/// verdict per lap, in lap order.
pub trait AccuracyCheck {
    fn check(&self, driver: &str, laps: &[Lap]) -> Result<Vec<LapAccuracy>, PaddockError>;
}

impl<F> AccuracyCheck for F
where
    F: Fn(&str, &[Lap]) -> Result<Vec<LapAccuracy>, PaddockError>,
{
    fn check(&self, driver: &str, laps: &[Lap]) -> Result<Vec<LapAccuracy>, PaddockError> {
        self(driver, laps)
    }
}

/// Keeps the accuracy already recorded on each lap.
#[derive(Debug, Clone, Copy)]
pub struct RecordedAccuracy {
    pub generated_laps_inaccurate: bool,
}

impl Default for RecordedAccuracy {
    fn default() -> Self {
        Self {
            generated_laps_inaccurate: true,
        }
    }
}

impl AccuracyCheck for RecordedAccuracy {
    fn check(&self, _driver: &str, laps: &[Lap]) -> Result<Vec<LapAccuracy>, PaddockError> {
        Ok(laps
            .iter()
            .map(|lap| {
                if lap.generated && self.generated_laps_inaccurate {
                    LapAccuracy::Inaccurate
                } else {
                    lap.accuracy
                }
            })
            .collect())
    }
}

/// Accuracy verdicts of one driver, in lap order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DriverAccuracy {
    pub driver: String,
    pub lap_numbers: Vec<u32>,
    pub verdicts: Vec<LapAccuracy>,
    /// Why the check could not be completed, verdicts are the failure verdict then
    pub failure: Option<String>,
}

impl DriverAccuracy {
    pub fn verdict(&self, lap_number: u32) -> Option<LapAccuracy> {
        self.lap_numbers
            .iter()
            .position(|n| *n == lap_number)
            .map(|i| self.verdicts[i])
    }

    pub fn inaccurate_laps(&self) -> usize {
        self.verdicts
            .iter()
            .filter(|v| **v == LapAccuracy::Inaccurate)
            .count()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AccuracyReport {
    pub drivers: Vec<DriverAccuracy>,
}

impl AccuracyReport {
    fn merge(results: impl IntoIterator<Item = DriverAccuracy>) -> Self {
        Self {
            drivers: results.into_iter().collect(),
        }
    }

    pub fn driver(&self, driver: &str) -> Option<&DriverAccuracy> {
        self.drivers.iter().find(|d| d.driver == driver)
    }

    pub fn verdict(&self, driver: &str, lap_number: u32) -> Option<LapAccuracy> {
        self.driver(driver)?.verdict(lap_number)
    }

    pub fn failed_drivers(&self) -> Vec<&str> {
        self.drivers
            .iter()
            .filter(|d| d.failure.is_some())
            .map(|d| d.driver.as_str())
            .collect()
    }

    /// Write the verdicts onto the session laps, driver by driver.
    pub fn apply(&self, session: &mut Session) {
        for result in &self.drivers {
            let Ok(driver_laps) = session.driver_mut(&result.driver) else {
                warn!("No laps for {} in session, skipping", result.driver);
                continue;
            };
            for lap in driver_laps.laps.iter_mut() {
                if let Some(verdict) = result.verdict(lap.number) {
                    lap.accuracy = verdict;
                }
            }
        }
    }
}

/// Compute accuracy for every driver of the session.
///
/// Each driver is evaluated on its own. If the check for a driver errors,
/// panics or returns the wrong number of verdicts, all laps of that driver are
/// set to `on_failure` and the other drivers are not affected.
pub fn compute_accuracy(
    session: &Session,
    check: &dyn AccuracyCheck,
    on_failure: LapAccuracy,
) -> AccuracyReport {
    AccuracyReport::merge(
        session
            .drivers
            .iter()
            .map(|driver_laps| evaluate_driver(driver_laps, check, on_failure)),
    )
}

fn evaluate_driver(
    driver_laps: &DriverLaps,
    check: &dyn AccuracyCheck,
    on_failure: LapAccuracy,
) -> DriverAccuracy {
    let lap_numbers = driver_laps.lap_numbers();
    match run_check(driver_laps, check) {
        Ok(verdicts) => {
            debug!(
                "{}: {} laps checked, {} inaccurate",
                driver_laps.driver,
                verdicts.len(),
                verdicts
                    .iter()
                    .filter(|v| **v == LapAccuracy::Inaccurate)
                    .count()
            );
            DriverAccuracy {
                driver: driver_laps.driver.clone(),
                lap_numbers,
                verdicts,
                failure: None,
            }
        }
        Err(e) => {
            warn!("{}", e);
            DriverAccuracy {
                driver: driver_laps.driver.clone(),
                verdicts: vec![on_failure; lap_numbers.len()],
                lap_numbers,
                failure: Some(e.to_string()),
            }
        }
    }
}

fn run_check(
    driver_laps: &DriverLaps,
    check: &dyn AccuracyCheck,
) -> Result<Vec<LapAccuracy>, PaddockError> {
    let failure = |reason: String| PaddockError::AccuracyCheckFailure {
        driver: driver_laps.driver.clone(),
        reason,
    };

    validate_numbering(driver_laps).map_err(|e| failure(e.to_string()))?;

    let verdicts = panic::catch_unwind(AssertUnwindSafe(|| {
        check.check(&driver_laps.driver, &driver_laps.laps)
    }))
    .map_err(|payload| failure(panic_message(payload.as_ref())))?
    .map_err(|e| match e {
        PaddockError::AccuracyCheckFailure { .. } => e,
        other => failure(other.to_string()),
    })?;

    if verdicts.len() != driver_laps.laps.len() {
        return Err(failure(format!(
            "{} verdicts for {} laps",
            verdicts.len(),
            driver_laps.laps.len()
        )));
    }
    Ok(verdicts)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("check panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("check panicked: {}", message)
    } else {
        "check panicked".to_string()
    }
}
