use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::{DriverLaps, Lap, Session};
use crate::PaddockError;

/// One line of a session lap file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LapRecord {
    pub driver: String,
    #[serde(flatten)]
    pub lap: Lap,
}

impl Session {
    /// Flatten the session back into lap records, driver by driver.
    pub fn records(&self) -> impl Iterator<Item = LapRecord> + '_ {
        self.drivers.iter().flat_map(|d| {
            d.laps.iter().map(|lap| LapRecord {
                driver: d.driver.clone(),
                lap: lap.clone(),
            })
        })
    }

    /// Group lap records by driver, in the order drivers first appear.
    pub fn from_records(name: impl Into<String>, records: impl IntoIterator<Item = LapRecord>) -> Self {
        let mut session = Session::new(name);
        for record in records {
            match session.drivers.iter_mut().find(|d| d.driver == record.driver) {
                Some(driver_laps) => driver_laps.laps.push(record.lap),
                None => session
                    .drivers
                    .push(DriverLaps::new(record.driver, vec![record.lap])),
            }
        }
        session
    }
}

pub fn load_session_jsonl(source_file: &Path, name: &str) -> Result<Session, PaddockError> {
    let records = serde_jsonlines::json_lines(source_file)
        .map_err(|e| PaddockError::SessionLoaderError { source: e })?
        .collect::<Result<Vec<LapRecord>, std::io::Error>>()
        .map_err(|e| PaddockError::SessionLoaderError { source: e })?;

    let session = Session::from_records(name, records);
    info!(
        "Loaded {} laps for {} drivers from {:?}",
        session.lap_count(),
        session.drivers.len(),
        source_file
    );
    Ok(session)
}
