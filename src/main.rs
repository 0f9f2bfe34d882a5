use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use paddock::{
    LapAccuracy, PaddockError, SessionIdentifier, ValidatorConfig, compute_accuracy,
    insert_crash_lap,
    laps::{load_session_jsonl, validate_numbering},
    schedule::{FallbackSchedule, JsonFileSchedule, ScheduleSource, find_event},
    writer,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check lap numbering and compute per-driver lap accuracy
    Validate {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Mark laps of drivers whose check failed as inaccurate instead of unknown
        #[arg(long)]
        fail_as_inaccurate: bool,
    },
    /// Insert a generated lap for a driver that crashed
    CrashLap {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        driver: String,

        #[arg(short, long)]
        lap: u32,

        /// Where to write the corrected laps, the input file is left untouched
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List the events of a season
    Schedule {
        #[arg(short, long)]
        year: i32,

        #[arg(short, long)]
        dir: Option<PathBuf>,

        #[arg(long)]
        fallback_dir: Option<PathBuf>,

        /// Event name or round number
        #[arg(short, long)]
        event: Option<String>,
    },
    /// Show the name and date of a session of an event
    Session {
        #[arg(short, long)]
        year: i32,

        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Event name or round number
        #[arg(short, long, required_unless_present = "testing")]
        event: Option<String>,

        /// Number of the pre-season test, starting at 1
        #[arg(short, long, conflicts_with = "event")]
        testing: Option<usize>,

        /// Session number, name or abbreviation
        #[arg(short, long)]
        session: String,
    },
}

fn session_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "session".to_string())
}

fn validate(
    config: &ValidatorConfig,
    input: &Path,
    output: Option<&Path>,
    fail_as_inaccurate: bool,
) -> Result<(), PaddockError> {
    let session = load_session_jsonl(input, &session_name(input))?;
    for driver_laps in &session.drivers {
        if let Err(e) = validate_numbering(driver_laps) {
            warn!("{}", e);
        }
    }

    let on_failure = if fail_as_inaccurate {
        LapAccuracy::Inaccurate
    } else {
        config.failure_verdict
    };
    let report = compute_accuracy(&session, &config.accuracy_check(), on_failure);

    for result in &report.drivers {
        match &result.failure {
            Some(reason) => println!(
                "{:<8} {} laps, check failed: {}",
                result.driver,
                result.verdicts.len(),
                reason
            ),
            None => println!(
                "{:<8} {} laps, {} inaccurate",
                result.driver,
                result.verdicts.len(),
                result.inaccurate_laps()
            ),
        }
    }

    if let Some(output_file) = output {
        let written = writer::write_report(output_file, &report)?;
        info!("Wrote {} driver results to {:?}", written, output_file);
    }
    Ok(())
}

fn crash_lap(
    input: &Path,
    driver: &str,
    lap: u32,
    output: &Path,
) -> Result<(), PaddockError> {
    let mut session = load_session_jsonl(input, &session_name(input))?;
    let driver_laps = session.driver_mut(driver)?;
    let number = insert_crash_lap(driver_laps, lap)?;
    validate_numbering(driver_laps)?;
    println!("{}: generated lap {}", driver, number);

    let written = writer::write_session(output, &session)?;
    info!("Wrote {} laps to {:?}", written, output);
    Ok(())
}

fn schedule_source(
    config: &ValidatorConfig,
    dir: Option<PathBuf>,
    fallback_dir: Option<PathBuf>,
) -> Result<Box<dyn ScheduleSource>, PaddockError> {
    let dir = dir
        .or_else(|| config.schedule_dir.clone())
        .map_or_else(std::env::current_dir, Ok)
        .map_err(|e| PaddockError::ConfigIOError { source: e })?;
    let primary = JsonFileSchedule::new(dir);
    Ok(match fallback_dir {
        Some(fallback) => Box::new(FallbackSchedule::new(
            primary,
            JsonFileSchedule::new(fallback),
        )),
        None => Box::new(primary),
    })
}

fn schedule(
    source: &dyn ScheduleSource,
    year: i32,
    event: Option<&str>,
) -> Result<(), PaddockError> {
    let schedule = source.load_schedule(year)?;
    let events = match event {
        Some(query) => vec![find_event(&schedule, query)?],
        None => schedule.events.iter().collect(),
    };
    for event in events {
        println!(
            "{:>2}  {:<28} {:<16} {}",
            event.round_number,
            event.event_name,
            event.location,
            event
                .event_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        );
    }
    Ok(())
}

fn session(
    source: &dyn ScheduleSource,
    year: i32,
    event: Option<&str>,
    testing: Option<usize>,
    session: &str,
) -> Result<(), PaddockError> {
    let schedule = source.load_schedule(year)?;
    let event = match (testing, event) {
        (Some(number), _) => schedule.testing_event(number)?,
        (None, Some(query)) => find_event(&schedule, query)?,
        (None, None) => {
            return Err(PaddockError::EventNotFound {
                name: String::new(),
            });
        }
    };
    let Ok(identifier) = session.parse::<SessionIdentifier>();
    let name = event.get_session_name(&identifier)?;
    let date = event.get_session_date(&identifier)?;
    println!(
        "{} {}: {} {}",
        year,
        event.event_name,
        name,
        date.map(|d| d.to_string()).unwrap_or_default()
    );
    Ok(())
}

fn run(cli: Args) -> Result<(), PaddockError> {
    let config = ValidatorConfig::from_local_file()
        .unwrap_or_else(|e| {
            warn!("Could not read config file, using defaults: {}", e);
            None
        })
        .unwrap_or_default();

    match cli.command {
        Commands::Validate {
            input,
            output,
            fail_as_inaccurate,
        } => validate(&config, &input, output.as_deref(), fail_as_inaccurate),
        Commands::CrashLap {
            input,
            driver,
            lap,
            output,
        } => crash_lap(&input, &driver, lap, &output),
        Commands::Schedule {
            year,
            dir,
            fallback_dir,
            event,
        } => schedule(
            schedule_source(&config, dir, fallback_dir)?.as_ref(),
            year,
            event.as_deref(),
        ),
        Commands::Session {
            year,
            dir,
            event,
            testing,
            session: id,
        } => session(
            schedule_source(&config, dir, None)?.as_ref(),
            year,
            event.as_deref(),
            testing,
            &id,
        ),
    }
}

fn main() {
    #[cfg(debug_assertions)]
    colog::init();

    if let Err(e) = run(Args::parse()) {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
