use std::time::Duration;

use crate::{
    app::{AnchorState, App, MessageKind, SubmitGate},
    poller::PollState,
    render::{render, RenderOptions},
    result::decode_response,
    seq::fasta::{parse_fasta_str, ParseOptions},
    validate::ValidatorConfig,
};

fn test_app() -> App {
    let records = parse_fasta_str(
        ">s1\nMKVLAA\n>sp|Q9|X_HUMAN\nWWPP\n>s3\nGG\n",
        &ParseOptions::default(),
    )
    .unwrap();
    App::new("job1", &records, '>')
}

#[test]
fn test_anchors_from_query() {
    let app = test_app();
    assert_eq!(app.num_anchors(), 3);
    assert!(app.anchor("s1").is_some());
    assert!(app.anchor("sp\\|Q9\\|X_HUMAN").is_some());
    assert_eq!(app.num_populated(), 0);
}

#[test]
fn test_partial_results_leave_other_anchors_alone() {
    let mut app = test_app();
    let results = decode_response(r#"{"s1": {"score": 0.123456, "path": "GGCCHH"}}"#)
        .unwrap()
        .unwrap();
    let updates = render(&results, &app, &RenderOptions::default());
    assert_eq!(app.apply_updates(updates.clone()), 1);

    assert!(matches!(
        app.anchor("s1").unwrap().state,
        AnchorState::Populated { .. }
    ));
    assert_eq!(app.anchor("s3").unwrap().state, AnchorState::Placeholder);

    // Idempotent
    let before = app.anchors.clone();
    app.apply_updates(updates);
    assert_eq!(app.anchors, before);
}

#[test]
fn test_torn_down_view_is_not_updated() {
    let mut app = test_app();
    let results = decode_response(r#"{"s1": {"score": 1.0, "path": "GGCCHH"}}"#)
        .unwrap()
        .unwrap();
    let updates = render(&results, &app, &RenderOptions::default());
    app.tear_down();
    assert_eq!(app.apply_updates(updates), 0);
    app.set_poll_state(PollState::Failed(String::from("late")));
    assert_eq!(app.poll_state(), &PollState::Idle);
    assert_eq!(app.num_populated(), 0);
}

#[test]
fn test_from_results() {
    let results = decode_response(r#"{"a": {"score": 1.0, "path": "G"}, "b": {"score": 2.0, "path": "C"}}"#)
        .unwrap()
        .unwrap();
    let app = App::from_results("job1", &results, '>');
    assert_eq!(app.num_anchors(), 2);
    assert_eq!(app.anchor("a").unwrap().sequence, "");
}

#[test]
fn test_poll_state_messages() {
    let mut app = test_app();
    app.set_poll_state(PollState::Populated {
        count: 3,
        elapsed: Duration::from_millis(1500),
    });
    assert_eq!(app.current_message().message, "3 seqs | took 1.500 secs");
    assert_eq!(app.current_message().kind, MessageKind::Info);

    app.set_poll_state(PollState::Failed(String::from("Transport error: HTTP 500")));
    assert_eq!(app.current_message().kind, MessageKind::Error);
    assert_eq!(app.current_message().prefix, "ERROR: ");
}

#[test]
fn test_submit_gate() {
    let cfg = ValidatorConfig::default();
    let mut gate = SubmitGate::new();
    assert!(!gate.enabled);

    assert!(gate.check(">s1\nACDE\n", &cfg).is_some());
    assert!(gate.enabled);
    assert_eq!(gate.message.message, "OK");

    let validated = gate.check(">s1\nACDE\n>s2\nACDX\n", &cfg).unwrap();
    assert!(gate.enabled);
    assert_eq!(gate.message.kind, MessageKind::Warning);
    assert_eq!(validated.records.len(), 2);

    assert!(gate.check("ACDE\n>s1\n", &cfg).is_none());
    assert!(!gate.enabled);
    assert_eq!(gate.message.kind, MessageKind::Error);
}

#[test]
fn test_deliver_results() {
    let mut app = test_app();
    let results = decode_response(r#"{"s1": {"score": 0.5, "path": "GGCCHH"}, "s3": {"score": 0.25, "path": "GG"}}"#)
        .unwrap()
        .unwrap();
    let state = PollState::Populated {
        count: results.len(),
        elapsed: Duration::from_secs(2),
    };
    app.deliver(state, Some(&results), &RenderOptions::default());
    assert_eq!(app.num_populated(), 2);
    assert_eq!(app.current_message().message, "2 seqs | took 2.000 secs");
}

#[test]
fn test_deliver_pending_keeps_placeholders() {
    let mut app = test_app();
    app.deliver(PollState::Pending, None, &RenderOptions::default());
    assert_eq!(app.num_populated(), 0);
    assert_eq!(app.current_message().kind, MessageKind::Warning);
}

#[test]
fn test_deliver_without_query() {
    let mut app = App::new("job1", &crate::seq::file::SeqMap::new(), '>');
    let results = decode_response(r#"{"a": {"score": 1.0, "path": "GG"}}"#)
        .unwrap()
        .unwrap();
    let state = PollState::Populated {
        count: 1,
        elapsed: Duration::from_millis(10),
    };
    app.deliver(state, Some(&results), &RenderOptions::default());
    assert_eq!(app.num_anchors(), 1);
    assert_eq!(app.num_populated(), 1);
}
