use itertools::Itertools;
use log::{debug, warn};

use super::{DriverLaps, Lap};
use crate::PaddockError;

/// Insert `lap` at `insertion_point` and number it after the lap before it.
///
/// A lap inserted at the start of the sequence is lap 1. Every lap after the
/// insertion point is renumbered so the sequence stays contiguous. Returns the
/// number given to the inserted lap. Fails without touching the laps when the
/// previous lap is numbered 0 or the numbers would overflow.
pub fn assign_lap_number(
    driver_laps: &mut DriverLaps,
    insertion_point: usize,
    mut lap: Lap,
) -> Result<u32, PaddockError> {
    if insertion_point > driver_laps.laps.len() {
        return Err(PaddockError::Numbering {
            driver: driver_laps.driver.clone(),
            reason: format!(
                "insertion point {} is past the end of {} laps",
                insertion_point,
                driver_laps.laps.len()
            ),
        });
    }

    let overflow = || PaddockError::Numbering {
        driver: driver_laps.driver.clone(),
        reason: "lap numbers would exceed the largest lap number".to_string(),
    };
    let number = match insertion_point.checked_sub(1) {
        Some(prev) => match driver_laps.laps[prev].number {
            0 => {
                return Err(PaddockError::Numbering {
                    driver: driver_laps.driver.clone(),
                    reason: format!("lap at position {} is numbered 0", prev),
                });
            }
            prev_number => prev_number.checked_add(1).ok_or_else(overflow)?,
        },
        None => 1,
    };
    let following = (driver_laps.laps.len() - insertion_point) as u64;
    if u64::from(number) + following > u64::from(u32::MAX) {
        return Err(overflow());
    }

    lap.number = number;
    driver_laps.laps.insert(insertion_point, lap);
    for (offset, following_lap) in driver_laps
        .laps
        .iter_mut()
        .skip(insertion_point + 1)
        .enumerate()
    {
        following_lap.number = number + offset as u32 + 1;
    }

    debug!(
        "{}: placed lap {} at position {}",
        driver_laps.driver, number, insertion_point
    );
    Ok(number)
}

/// Insert a generated lap for a driver that crashed on `crashed_on_lap`.
///
/// The generated lap goes in front of the first recorded lap numbered
/// `crashed_on_lap` or later, or at the end when the driver never got that far.
/// Lap 0 is read as lap 1. A sequence that does not start at 1 or has gaps is
/// renumbered from 1 first.
pub fn insert_crash_lap(
    driver_laps: &mut DriverLaps,
    crashed_on_lap: u32,
) -> Result<u32, PaddockError> {
    if let Err(e) = validate_numbering(driver_laps) {
        warn!("{}, renumbering before inserting crash lap", e);
        renumber(driver_laps);
    }

    let crashed_on_lap = crashed_on_lap.max(1);
    let position = driver_laps
        .laps
        .iter()
        .position(|l| l.number >= crashed_on_lap)
        .unwrap_or(driver_laps.laps.len());
    assign_lap_number(driver_laps, position, Lap::generated())
}

/// Number the laps 1..=n in their current order.
pub fn renumber(driver_laps: &mut DriverLaps) {
    for (number, lap) in (1..).zip(driver_laps.laps.iter_mut()) {
        lap.number = number;
    }
}

/// Check that lap numbers start at 1 and increase by exactly one.
pub fn validate_numbering(driver_laps: &DriverLaps) -> Result<(), PaddockError> {
    let invalid = |reason: String| PaddockError::InvalidLapSequence {
        driver: driver_laps.driver.clone(),
        reason,
    };

    if let Some(first) = driver_laps.laps.first() {
        if first.number != 1 {
            return Err(invalid(format!(
                "first lap is numbered {} instead of 1",
                first.number
            )));
        }
    }

    if let Some((position, (prev, cur))) = driver_laps
        .laps
        .iter()
        .tuple_windows()
        .enumerate()
        .find(|(_, (prev, cur))| prev.number.checked_add(1) != Some(cur.number))
    {
        return Err(invalid(format!(
            "lap {} at position {} follows lap {}",
            cur.number,
            position + 1,
            prev.number
        )));
    }

    Ok(())
}
