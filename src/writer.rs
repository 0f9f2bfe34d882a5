use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use log::error;
use serde::Serialize;

use crate::{PaddockError, laps::AccuracyReport, laps::Session};

/// Write any sequence of rows as JSON lines.
fn write_jsonl<T: Serialize>(
    file: &Path,
    rows: impl IntoIterator<Item = T>,
) -> Result<usize, PaddockError> {
    let output_file = File::create(file).map_err(|e| PaddockError::WriterError { source: e })?;
    let mut output_file_writer = BufWriter::new(output_file);
    let mut written = 0;
    for row in rows {
        match serde_json::to_string(&row) {
            Ok(line) => {
                writeln!(output_file_writer, "{}", line)
                    .map_err(|e| PaddockError::WriterError { source: e })?;
                written += 1;
            }
            Err(e) => error!("Error while serializing row for output file: {}", e),
        }
    }
    output_file_writer
        .flush()
        .map_err(|e| PaddockError::WriterError { source: e })?;
    Ok(written)
}

/// One line per driver.
pub fn write_report(file: &Path, report: &AccuracyReport) -> Result<usize, PaddockError> {
    write_jsonl(file, &report.drivers)
}

/// One line per lap, in the same layout the session loader reads.
pub fn write_session(file: &Path, session: &Session) -> Result<usize, PaddockError> {
    write_jsonl(file, session.records())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::laps::{
        DriverAccuracy, DriverLaps, Lap, LapAccuracy, load_session_jsonl,
    };
    use tempfile::TempDir;

    #[test]
    fn test_write_report_one_line_per_driver() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.jsonl");
        let report = AccuracyReport {
            drivers: vec![
                DriverAccuracy {
                    driver: "A".to_string(),
                    lap_numbers: vec![1],
                    verdicts: vec![LapAccuracy::Accurate],
                    failure: None,
                },
                DriverAccuracy {
                    driver: "B".to_string(),
                    lap_numbers: vec![1, 2],
                    verdicts: vec![LapAccuracy::Unknown; 2],
                    failure: Some("no data".to_string()),
                },
            ],
        };

        assert_eq!(write_report(&path, &report).unwrap(), 2);
        let rows = serde_jsonlines::json_lines(&path)
            .unwrap()
            .collect::<Result<Vec<DriverAccuracy>, std::io::Error>>()
            .unwrap();
        assert_eq!(rows, report.drivers);
    }

    #[test]
    fn test_written_session_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("laps.jsonl");
        let session = Session::new("Race").with_driver(DriverLaps::new(
            "NOR",
            vec![Lap::generated(), Lap::new(2, 95.5, LapAccuracy::Accurate)],
        ));

        assert_eq!(write_session(&path, &session).unwrap(), 2);
        assert_eq!(load_session_jsonl(&path, "Race").unwrap(), session);
    }
}
