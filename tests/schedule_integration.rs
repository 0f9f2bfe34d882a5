// Integration test for event schedule loading and session lookup

use paddock::schedule::{
    EventFormat, FallbackSchedule, JsonFileSchedule, ScheduleSource, ScheduledSession, find_event,
};
use paddock::{Event, EventSchedule, SessionIdentifier, SessionKind};
use tempfile::TempDir;

fn spa() -> Event {
    Event {
        round_number: 12,
        country: "Belgium".to_string(),
        location: "Spa-Francorchamps".to_string(),
        event_name: "Belgian Grand Prix".to_string(),
        official_event_name: "FORMULA 1 ROLEX BELGIAN GRAND PRIX 2021".to_string(),
        event_date: None,
        event_format: EventFormat::Conventional,
        sessions: [
            SessionKind::Practice1,
            SessionKind::Practice2,
            SessionKind::Practice3,
            SessionKind::Qualifying,
            SessionKind::Race,
        ]
        .into_iter()
        .map(|kind| ScheduledSession {
            name: kind.name().to_string(),
            date: None,
        })
        .collect(),
    }
}

#[test]
fn test_schedule_integration() {
    // Store a schedule in the fallback directory only
    let primary_dir = TempDir::new().unwrap();
    let fallback_dir = TempDir::new().unwrap();
    let fallback = JsonFileSchedule::new(fallback_dir.path().to_path_buf());
    fallback
        .save_schedule(&EventSchedule::new(2021, vec![spa()]))
        .unwrap();

    let source = FallbackSchedule::new(
        JsonFileSchedule::new(primary_dir.path().to_path_buf()),
        fallback,
    );
    let schedule = source.load_schedule(2021).unwrap();
    assert_eq!(schedule.year, 2021);

    // Look the event up by name and by round
    let event = find_event(&schedule, "belgium").unwrap();
    assert_eq!(event.round_number, 12);
    assert_eq!(find_event(&schedule, "12").unwrap(), event);

    // Resolve sessions the three supported ways
    let by_number = event
        .get_session_name(&SessionIdentifier::Number(4))
        .unwrap();
    let by_abbreviation = event
        .get_session_name(&SessionIdentifier::Name("Q".to_string()))
        .unwrap();
    let by_name = event
        .get_session_name(&SessionIdentifier::Name("qualifying".to_string()))
        .unwrap();
    assert_eq!(by_number, "Qualifying");
    assert_eq!(by_abbreviation, by_number);
    assert_eq!(by_name, by_number);
    assert_eq!(
        event
            .get_session_date(&SessionIdentifier::Name("R".to_string()))
            .unwrap(),
        None
    );
}

#[test]
fn test_testing_event_reached_by_number_only() {
    let mut test = spa();
    test.round_number = 0;
    test.event_name = "Pre-Season Test".to_string();
    test.official_event_name = "FORMULA 1 PRE-SEASON TESTING 2021".to_string();
    test.event_format = EventFormat::Testing;
    test.sessions.truncate(3);
    let schedule = EventSchedule::new(2021, vec![test, spa()]);

    // both events are in Belgium, the name lookup only sees the race weekend
    assert_eq!(find_event(&schedule, "belgium").unwrap().round_number, 12);
    let testing = schedule.testing_event(1).unwrap();
    assert_eq!(testing.event_name, "Pre-Season Test");
    assert_eq!(
        testing
            .get_session_name(&"3.0".parse::<SessionIdentifier>().unwrap())
            .unwrap(),
        "Practice 3"
    );
}
