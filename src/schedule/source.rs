use std::fs;
use std::path::PathBuf;

use log::{debug, error};

use super::EventSchedule;
use crate::PaddockError;

/// Anything that can produce the event schedule of a season
pub trait ScheduleSource {
    fn load_schedule(&self, year: i32) -> Result<EventSchedule, PaddockError>;
}

/// Reads `schedule_{year}.json` files from a local directory.
///
/// Each file holds a JSON array of events in the `Event` layout.
pub struct JsonFileSchedule {
    dir: PathBuf,
}

impl JsonFileSchedule {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn file_path_for_year(&self, year: i32) -> PathBuf {
        self.dir.join(format!("schedule_{}.json", year))
    }

    pub fn save_schedule(&self, schedule: &EventSchedule) -> Result<(), PaddockError> {
        let year = schedule.year;
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .map_err(|e| PaddockError::ScheduleIOError { year, source: e })?;
        }
        let content = serde_json::to_string_pretty(&schedule.events)
            .map_err(|e| PaddockError::ScheduleParseError { year, source: e })?;
        fs::write(self.file_path_for_year(year), content)
            .map_err(|e| PaddockError::ScheduleIOError { year, source: e })
    }
}

impl ScheduleSource for JsonFileSchedule {
    fn load_schedule(&self, year: i32) -> Result<EventSchedule, PaddockError> {
        let file_path = self.file_path_for_year(year);
        debug!("Loading event schedule from {:?}", file_path);

        let content = fs::read_to_string(&file_path)
            .map_err(|e| PaddockError::ScheduleIOError { year, source: e })?;
        let events = serde_json::from_str(&content)
            .map_err(|e| PaddockError::ScheduleParseError { year, source: e })?;

        Ok(EventSchedule::new(year, events))
    }
}

/// Uses `fallback` whenever `primary` cannot produce a schedule.
pub struct FallbackSchedule<P, F> {
    primary: P,
    fallback: F,
}

impl<P: ScheduleSource, F: ScheduleSource> FallbackSchedule<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: ScheduleSource, F: ScheduleSource> ScheduleSource for FallbackSchedule<P, F> {
    fn load_schedule(&self, year: i32) -> Result<EventSchedule, PaddockError> {
        self.primary.load_schedule(year).or_else(|e| {
            error!(
                "Failed to access primary schedule source, falling back. Reason: {}",
                e
            );
            self.fallback.load_schedule(year)
        })
    }
}

impl ScheduleSource for EventSchedule {
    fn load_schedule(&self, year: i32) -> Result<EventSchedule, PaddockError> {
        if self.year == year {
            Ok(self.clone())
        } else {
            Err(PaddockError::ScheduleIOError {
                year,
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("only the {} schedule is held in memory", self.year),
                ),
            })
        }
    }
}
