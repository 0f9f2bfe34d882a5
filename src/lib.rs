// Library interface for paddock
// This allows integration tests to access internal modules

pub mod config;
pub mod errors;
pub mod laps;
pub mod schedule;
pub mod writer;

// Re-export commonly used types
pub use config::ValidatorConfig;
pub use errors::PaddockError;
pub use laps::{
    AccuracyCheck, AccuracyReport, DriverLaps, Lap, LapAccuracy, Session, assign_lap_number,
    compute_accuracy, insert_crash_lap,
};
pub use schedule::{Event, EventSchedule, SessionIdentifier, SessionKind};
