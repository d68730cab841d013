//! Session driver behavior under adversarial event sequences.

use transmux::engine::{
    EngineCommand, MediaEngine, ScriptedEngine, SessionEvent, SessionEventKind, StatusCode,
};
use transmux::error::Error;
use transmux::session::{SessionDriver, SessionState};

const LIFECYCLE: [SessionEventKind; 4] = [
    SessionEventKind::TopologySet,
    SessionEventKind::Started,
    SessionEventKind::Ended,
    SessionEventKind::Closed,
];

fn run_script(
    events: impl IntoIterator<Item = SessionEvent>,
) -> (ScriptedEngine, SessionDriver, Result<(), Error>) {
    let mut engine = ScriptedEngine::scripted(events);
    let session = engine.create_session().unwrap();
    let mut driver = SessionDriver::new(session);
    let result = driver.run_to_completion(&mut engine);
    (engine, driver, result)
}

#[test]
fn duplicate_events_are_harmless() {
    let (engine, driver, result) = run_script([
        SessionEvent::ok(SessionEventKind::TopologySet),
        SessionEvent::ok(SessionEventKind::TopologySet),
        SessionEvent::ok(SessionEventKind::Started),
        SessionEvent::ok(SessionEventKind::Started),
        SessionEvent::ok(SessionEventKind::Ended),
        SessionEvent::ok(SessionEventKind::Closed),
    ]);

    result.unwrap();
    assert_eq!(driver.state(), SessionState::Closed);
    // Each TopologySet triggered its action; the state never regressed.
    let starts = engine
        .commands()
        .iter()
        .filter(|c| **c == EngineCommand::Start)
        .count();
    assert_eq!(starts, 2);
}

#[test]
fn skipped_events_still_reach_closed() {
    // The engine jumps straight from topology to closed; the observed
    // state sequence is a prefix-with-gaps of the lifecycle, never a
    // regression.
    let (engine, driver, result) = run_script([
        SessionEvent::ok(SessionEventKind::TopologySet),
        SessionEvent::ok(SessionEventKind::Closed),
    ]);

    result.unwrap();
    assert_eq!(driver.state(), SessionState::Closed);
    // Close is only commanded on Ended, which never arrived.
    assert!(!engine.commands().contains(&EngineCommand::Close));
}

#[test]
fn failure_at_every_position_terminates_with_that_status() {
    for failing in 0..LIFECYCLE.len() {
        let status = StatusCode(0x8800_0000 + failing as u32);
        let events = LIFECYCLE.iter().enumerate().map(|(i, &kind)| {
            if i == failing {
                SessionEvent::failed(kind, status)
            } else {
                SessionEvent::ok(kind)
            }
        });

        let (_, driver, result) = run_script(events.collect::<Vec<_>>());
        match result {
            Err(Error::Session(got)) => assert_eq!(got, status, "position {}", failing),
            other => panic!("position {}: expected session failure, got {:?}", failing, other),
        }
        assert_ne!(driver.state(), SessionState::Closed);
    }
}

#[test]
fn start_command_failure_aborts_the_loop() {
    let mut engine = ScriptedEngine::manual().fail_start(StatusCode(0xC004_0001));
    let feed = engine.feed().unwrap();
    let session = engine.create_session().unwrap();
    feed.push(SessionEvent::ok(SessionEventKind::TopologySet));

    let mut driver = SessionDriver::new(session);
    let err = driver.run_to_completion(&mut engine).unwrap_err();
    assert!(matches!(err, Error::Session(StatusCode(0xC004_0001))));
    assert_eq!(driver.state(), SessionState::Unbound);
}

#[test]
fn unknown_event_flood_does_not_stall_the_lifecycle() {
    let mut events: Vec<SessionEvent> = (0..16)
        .map(|code| SessionEvent::ok(SessionEventKind::Other(1000 + code)))
        .collect();
    events.extend(LIFECYCLE.map(SessionEvent::ok));

    let (_, driver, result) = run_script(events);
    result.unwrap();
    assert_eq!(driver.state(), SessionState::Closed);
}
