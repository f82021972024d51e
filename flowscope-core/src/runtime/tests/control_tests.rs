use crate::matcher::FnClassifier;
use crate::pipeline::{Filter, Mode, Session, SessionSettings, VisualEvent};
use crate::record::RawRecord;
use crate::runtime::{Control, UnknownControl};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[test]
fn controls_parse_from_text() {
    let cases = [
        ("next", Control::Advance),
        ("  reset ", Control::Reset),
        ("replay", Control::EnterReplay),
        ("back", Control::ExitReplay),
        ("clear", Control::ClearReplayLog),
        ("filter component A", Control::SetFilter(Filter::Component("A".to_string()))),
        ("filter fsm 42", Control::SetFilter(Filter::Fsm("42".to_string()))),
        ("unfilter", Control::ClearFilter),
        ("quit", Control::Quit),
    ];

    for (text, expected) in cases {
        assert_eq!(text.parse::<Control>().unwrap(), expected, "parsing '{text}'");
    }
}

#[test]
fn unknown_control_is_rejected() {
    assert_eq!(
        "filter".parse::<Control>(),
        Err(UnknownControl("filter".to_string()))
    );
    assert!("jump".parse::<Control>().is_err());
}

#[test]
fn display_round_trips_through_parse() {
    let control = Control::SetFilter(Filter::Fsm("abc".to_string()));

    assert_eq!(control.to_string().parse::<Control>().unwrap(), control);
}

#[test]
fn applying_controls_drives_the_session() {
    // Arrange
    let mut session = Session::new(
        Arc::new(FnClassifier::new(|_: &RawRecord| Vec::new())),
        SessionSettings::default(),
        vec![vec![VisualEvent::log("one")], vec![VisualEvent::log("two")]],
    );

    // Act
    let keep_going = [Control::Advance, Control::Advance, Control::Reset]
        .into_iter()
        .all(|c| c.apply(&mut session));

    // Assert
    assert!(keep_going);
    assert_eq!(session.mode(), Mode::Scripted);
    assert_eq!(session.cursor(), 0);
    assert_eq!(session.queue().len(), 2);
    assert!(!Control::Quit.apply(&mut session));
}

#[test]
fn rejected_control_keeps_the_session_running() {
    let mut session = Session::new(
        Arc::new(FnClassifier::new(|_: &RawRecord| Vec::new())),
        SessionSettings::default(),
        Vec::new(),
    );

    assert!(Control::EnterReplay.apply(&mut session));
    assert_eq!(session.mode(), Mode::Live);
    assert_eq!(session.drain_diagnostics().len(), 1);
}
