// Season event schedule and session lookup

pub mod source;

use std::str::FromStr;

use chrono::NaiveDateTime;
use log::debug;
use serde::{Deserialize, Serialize};

pub use source::{FallbackSchedule, JsonFileSchedule, ScheduleSource};

use crate::PaddockError;

/// Kind of session held during an event weekend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    Practice1,
    Practice2,
    Practice3,
    SprintQualifying,
    Qualifying,
    Race,
}

impl SessionKind {
    pub const ALL: [SessionKind; 6] = [
        SessionKind::Practice1,
        SessionKind::Practice2,
        SessionKind::Practice3,
        SessionKind::SprintQualifying,
        SessionKind::Qualifying,
        SessionKind::Race,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SessionKind::Practice1 => "Practice 1",
            SessionKind::Practice2 => "Practice 2",
            SessionKind::Practice3 => "Practice 3",
            SessionKind::SprintQualifying => "Sprint Qualifying",
            SessionKind::Qualifying => "Qualifying",
            SessionKind::Race => "Race",
        }
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            SessionKind::Practice1 => "FP1",
            SessionKind::Practice2 => "FP2",
            SessionKind::Practice3 => "FP3",
            SessionKind::SprintQualifying => "SQ",
            SessionKind::Qualifying => "Q",
            SessionKind::Race => "R",
        }
    }

    /// Resolve a full session name (any case) or an abbreviation.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .or_else(|| {
                Self::ALL
                    .into_iter()
                    .find(|kind| kind.abbreviation().eq_ignore_ascii_case(name))
            })
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How a session is picked out of an event: by slot number or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionIdentifier {
    Number(u8),
    Name(String),
}

impl FromStr for SessionIdentifier {
    type Err = std::convert::Infallible;

    /// Integer valued numbers such as `3` or `3.0` select a slot, anything
    /// else is taken as a session name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<f64>() {
            Ok(number) if number.fract() == 0.0 && (0.0..=u8::MAX as f64).contains(&number) => {
                SessionIdentifier::Number(number as u8)
            }
            _ => SessionIdentifier::Name(s.to_string()),
        })
    }
}

impl std::fmt::Display for SessionIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionIdentifier::Number(number) => write!(f, "{}", number),
            SessionIdentifier::Name(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventFormat {
    #[default]
    Conventional,
    Sprint,
    Testing,
}

/// One slot of the event timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledSession {
    pub name: String,
    pub date: Option<NaiveDateTime>,
}

/// A race weekend or a testing event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Championship round, testing events are round 0
    pub round_number: u32,
    pub country: String,
    pub location: String,
    pub event_name: String,
    #[serde(default)]
    pub official_event_name: String,
    pub event_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub event_format: EventFormat,
    /// Up to five slots, slot 1 first
    #[serde(default)]
    pub sessions: Vec<ScheduledSession>,
}

impl Event {
    pub const MAX_SESSIONS: usize = 5;

    pub fn is_testing(&self) -> bool {
        self.event_format == EventFormat::Testing
    }

    fn slot_position(&self, identifier: &SessionIdentifier) -> Result<usize, PaddockError> {
        let invalid = |reason: String| PaddockError::InvalidSession {
            identifier: identifier.to_string(),
            reason,
        };

        match identifier {
            SessionIdentifier::Number(number) => {
                let number = *number as usize;
                if !(1..=Self::MAX_SESSIONS).contains(&number) {
                    return Err(invalid(format!(
                        "session numbers range from 1 to {}",
                        Self::MAX_SESSIONS
                    )));
                }
                match self.sessions.get(number - 1) {
                    Some(slot) if !slot.name.is_empty() => Ok(number - 1),
                    _ => Err(invalid(format!(
                        "session number {} does not exist for this event",
                        number
                    ))),
                }
            }
            SessionIdentifier::Name(name) => {
                let kind = SessionKind::from_name(name)
                    .ok_or_else(|| invalid("unknown session type".to_string()))?;
                self.sessions
                    .iter()
                    .position(|slot| slot.name == kind.name())
                    .ok_or_else(|| {
                        invalid(format!("no session of type '{}' for this event", kind))
                    })
            }
        }
    }

    /// Full name of the session selected by `identifier`.
    pub fn get_session_name(&self, identifier: &SessionIdentifier) -> Result<&str, PaddockError> {
        let position = self.slot_position(identifier)?;
        Ok(self.sessions[position].name.as_str())
    }

    /// Date of the session selected by `identifier`, if the schedule has one.
    pub fn get_session_date(
        &self,
        identifier: &SessionIdentifier,
    ) -> Result<Option<NaiveDateTime>, PaddockError> {
        let position = self.slot_position(identifier)?;
        Ok(self.sessions[position].date)
    }

    /// Strings a user is likely to refer to this event by.
    fn matcher_strings(&self, year: i32) -> [String; 4] {
        [
            self.location.clone(),
            self.country.clone(),
            self.event_name.replace("Grand Prix", ""),
            self.official_event_name
                .replace("FORMULA 1", "")
                .replace(&year.to_string(), "")
                .replace("GRAND PRIX", ""),
        ]
    }
}

/// All events of one championship season, ordered as scheduled.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventSchedule {
    pub year: i32,
    pub events: Vec<Event>,
}

impl EventSchedule {
    pub fn new(year: i32, events: Vec<Event>) -> Self {
        Self { year, events }
    }

    pub fn get_event_by_round(&self, round: u32) -> Result<&Event, PaddockError> {
        if round == 0 {
            return Err(PaddockError::InvalidRound { round });
        }
        self.events
            .iter()
            .find(|e| e.round_number == round && !e.is_testing())
            .ok_or(PaddockError::InvalidRound { round })
    }

    /// Find the event whose location, country or names best match `name`.
    ///
    /// This is a fuzzy match and always returns the closest event of a non
    /// empty schedule, even when nothing matches well. Candidates are scored
    /// with `strsim::normalized_levenshtein`, which counts substitutions as one
    /// edit where an indel ratio counts them as two, so close calls between
    /// similarly named events can rank differently than under an indel ratio.
    pub fn get_event_by_name(&self, name: &str) -> Result<&Event, PaddockError> {
        self.closest_event(name, self.events.iter())
    }

    /// Like `get_event_by_name`, but testing events are never returned.
    pub fn get_championship_event_by_name(&self, name: &str) -> Result<&Event, PaddockError> {
        self.closest_event(name, self.events.iter().filter(|e| !e.is_testing()))
    }

    fn closest_event<'a>(
        &self,
        name: &str,
        events: impl Iterator<Item = &'a Event>,
    ) -> Result<&'a Event, PaddockError> {
        let needle = name.to_lowercase();
        let mut best: Option<(&Event, f64)> = None;
        for event in events {
            let score = event
                .matcher_strings(self.year)
                .iter()
                .map(|candidate| {
                    strsim::normalized_levenshtein(&candidate.to_lowercase(), &needle)
                })
                .fold(0.0, f64::max);
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((event, score));
            }
        }

        let (event, score) = best.ok_or_else(|| PaddockError::EventNotFound {
            name: name.to_string(),
        })?;
        debug!(
            "Matched '{}' to {} with score {:.2}",
            name, event.event_name, score
        );
        Ok(event)
    }

    pub fn is_testing(&self) -> Vec<bool> {
        self.events.iter().map(Event::is_testing).collect()
    }

    pub fn without_testing(&self) -> EventSchedule {
        EventSchedule {
            year: self.year,
            events: self
                .events
                .iter()
                .filter(|e| !e.is_testing())
                .cloned()
                .collect(),
        }
    }

    pub fn testing_events(&self) -> Vec<&Event> {
        self.events.iter().filter(|e| e.is_testing()).collect()
    }

    /// The `number`-th testing event of the season, starting at 1.
    pub fn testing_event(&self, number: usize) -> Result<&Event, PaddockError> {
        number
            .checked_sub(1)
            .and_then(|i| self.testing_events().get(i).copied())
            .ok_or(PaddockError::InvalidTestingEvent { number })
    }
}

/// Resolve a championship event either by round number or by fuzzy name.
///
/// Testing events are never returned, use `EventSchedule::testing_event`.
pub fn find_event<'a>(schedule: &'a EventSchedule, query: &str) -> Result<&'a Event, PaddockError> {
    match query.trim().parse::<u32>() {
        Ok(round) => schedule.get_event_by_round(round),
        Err(_) => schedule.get_championship_event_by_name(query),
    }
}
