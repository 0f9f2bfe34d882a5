// Integration tests for lap numbering and accuracy validation
//
// Covers the full workflow:
// 1. Load lap records from a JSON lines file
// 2. Insert generated laps for crashes
// 3. Compute accuracy per driver and apply it to the session
// 4. Write the report and the corrected session back out

use std::io::Write;

use paddock::laps::{DriverAccuracy, RecordedAccuracy, load_session_jsonl, validate_numbering};
use paddock::writer::{write_report, write_session};
use paddock::{Lap, LapAccuracy, PaddockError, compute_accuracy, insert_crash_lap};
use tempfile::TempDir;

/// Helper that writes lap records to a JSON lines file inside `dir`
fn write_lap_file(dir: &TempDir, lines: &[&str]) -> std::path::PathBuf {
    let path = dir.path().join("race.jsonl");
    let mut file = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    path
}

#[test]
fn test_first_lap_crash_scenario() {
    let dir = TempDir::new().unwrap();
    let path = write_lap_file(
        &dir,
        &[
            r#"{"driver":"X","number":1,"lap_time_s":95.0,"accuracy":"Accurate"}"#,
            r#"{"driver":"X","number":2,"lap_time_s":91.3,"accuracy":"Accurate"}"#,
        ],
    );

    let mut session = load_session_jsonl(&path, "race").unwrap();
    let driver = session.driver_mut("X").unwrap();
    let number = insert_crash_lap(driver, 1).unwrap();

    assert_eq!(number, 1);
    assert_eq!(driver.lap_numbers(), vec![1, 2, 3]);
    assert!(driver.laps[0].generated);
    assert!(driver.laps.iter().all(|l| l.number != 0));
    assert!(validate_numbering(driver).is_ok());

    // the corrected session survives a round trip through the writer
    let out = dir.path().join("corrected.jsonl");
    write_session(&out, &session).unwrap();
    let reloaded = load_session_jsonl(&out, "race").unwrap();
    assert_eq!(reloaded.driver("X").unwrap().lap_numbers(), vec![1, 2, 3]);
}

#[test]
fn test_crash_lap_on_zero_based_lap_file() {
    let dir = TempDir::new().unwrap();
    let path = write_lap_file(
        &dir,
        &[
            r#"{"driver":"X","number":0,"lap_time_s":95.0,"accuracy":"Accurate"}"#,
            r#"{"driver":"X","number":1,"lap_time_s":91.3,"accuracy":"Accurate"}"#,
            r#"{"driver":"X","number":2,"lap_time_s":91.1,"accuracy":"Accurate"}"#,
        ],
    );

    let mut session = load_session_jsonl(&path, "race").unwrap();
    let driver = session.driver_mut("X").unwrap();
    assert_eq!(insert_crash_lap(driver, 1).unwrap(), 1);
    assert!(validate_numbering(driver).is_ok());

    let out = dir.path().join("corrected.jsonl");
    write_session(&out, &session).unwrap();
    let reloaded = load_session_jsonl(&out, "race").unwrap();
    assert_eq!(reloaded.driver("X").unwrap().lap_numbers(), vec![1, 2, 3, 4]);

    // the input file keeps its original numbering
    let original = load_session_jsonl(&path, "race").unwrap();
    assert_eq!(original.driver("X").unwrap().lap_numbers(), vec![0, 1, 2]);
}

#[test]
fn test_inaccurate_lap_of_one_driver_leaves_others_untouched() {
    let dir = TempDir::new().unwrap();
    let path = write_lap_file(
        &dir,
        &[
            r#"{"driver":"A","number":1,"lap_time_s":90.0,"accuracy":"Accurate"}"#,
            r#"{"driver":"B","number":1,"lap_time_s":90.5,"accuracy":"Accurate"}"#,
            r#"{"driver":"A","number":2,"lap_time_s":89.8,"accuracy":"Accurate"}"#,
            r#"{"driver":"B","number":2,"lap_time_s":90.1,"accuracy":"Accurate"}"#,
            r#"{"driver":"A","number":3,"lap_time_s":99.9,"accuracy":"Inaccurate"}"#,
            r#"{"driver":"B","number":3,"lap_time_s":90.2,"accuracy":"Accurate"}"#,
        ],
    );
    let mut session = load_session_jsonl(&path, "race").unwrap();

    let report = compute_accuracy(
        &session,
        &RecordedAccuracy::default(),
        LapAccuracy::Unknown,
    );
    report.apply(&mut session);

    let flags = |driver: &str| -> Vec<LapAccuracy> {
        session.driver(driver).unwrap().laps.iter().map(|l| l.accuracy).collect()
    };
    let (a, b) = (flags("A"), flags("B"));
    assert_eq!(
        a,
        vec![LapAccuracy::Accurate, LapAccuracy::Accurate, LapAccuracy::Inaccurate]
    );
    assert_eq!(b, vec![LapAccuracy::Accurate; 3]);
}

#[test]
fn test_failed_check_report_written_per_driver() {
    let dir = TempDir::new().unwrap();
    let path = write_lap_file(
        &dir,
        &[
            r#"{"driver":"A","number":1,"lap_time_s":90.0,"accuracy":"Accurate"}"#,
            r#"{"driver":"B","number":1,"lap_time_s":90.5,"accuracy":"Accurate"}"#,
        ],
    );
    let session = load_session_jsonl(&path, "race").unwrap();

    let check = |driver: &str, laps: &[Lap]| -> Result<Vec<LapAccuracy>, PaddockError> {
        if driver == "A" {
            return Err(PaddockError::AccuracyCheckFailure {
                driver: driver.to_string(),
                reason: "no position data".to_string(),
            });
        }
        Ok(laps.iter().map(|l| l.accuracy).collect())
    };
    let report = compute_accuracy(&session, &check, LapAccuracy::Inaccurate);

    let out = dir.path().join("report.jsonl");
    assert_eq!(write_report(&out, &report).unwrap(), 2);

    let rows = serde_jsonlines::json_lines(&out)
        .unwrap()
        .collect::<Result<Vec<DriverAccuracy>, std::io::Error>>()
        .unwrap();
    assert_eq!(rows[0].driver, "A");
    assert!(rows[0].failure.as_ref().unwrap().contains("no position data"));
    assert_eq!(rows[0].verdicts, vec![LapAccuracy::Inaccurate]);
    assert_eq!(rows[1].failure, None);
    assert_eq!(rows[1].verdicts, vec![LapAccuracy::Accurate]);
}
