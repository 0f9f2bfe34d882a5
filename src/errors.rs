// Error types for paddock

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum PaddockError {
    // Lap numbering errors
    #[snafu(display("Cannot place generated lap for {driver}: {reason}"))]
    Numbering { driver: String, reason: String },
    #[snafu(display("Invalid lap sequence for {driver}: {reason}"))]
    InvalidLapSequence { driver: String, reason: String },

    // Accuracy errors, never propagated past the driver they belong to
    #[snafu(display("Accuracy check failed for {driver}: {reason}"))]
    AccuracyCheckFailure { driver: String, reason: String },
    #[snafu(display("Unknown driver: {driver}"))]
    UnknownDriver { driver: String },

    // Session lap data I/O
    #[snafu(display("Error loading session lap data"))]
    SessionLoaderError { source: io::Error },
    #[snafu(display("Error writing accuracy report"))]
    WriterError { source: io::Error },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error reading or writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },

    // Event schedule errors
    #[snafu(display("Error reading event schedule for {year}"))]
    ScheduleIOError { year: i32, source: io::Error },
    #[snafu(display("Error parsing event schedule for {year}"))]
    ScheduleParseError {
        year: i32,
        source: serde_json::Error,
    },
    #[snafu(display("Invalid round: {round}"))]
    InvalidRound { round: u32 },
    #[snafu(display("Test event number {number} does not exist"))]
    InvalidTestingEvent { number: usize },
    #[snafu(display("No event matching '{name}'"))]
    EventNotFound { name: String },
    #[snafu(display("Invalid session '{identifier}': {reason}"))]
    InvalidSession { identifier: String, reason: String },
}
