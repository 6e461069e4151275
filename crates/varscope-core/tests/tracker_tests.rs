#![allow(clippy::unwrap_used, clippy::expect_used)]

use varscope_core::inspect::Introspector;
use varscope_core::logging_facility::test_capture::init_test_capture;
use varscope_core::node::{Metatype, NodeValue};
use varscope_core::Tracker;
use varscope_core_types::schema::EVENT_END;

#[test]
fn test_second_observation_is_pruned_against_first() {
    let mut tracker = Tracker::new(Introspector::new(5));
    let mut scores = vec![3, 4, 5];

    let first = tracker.observe("scores", &scores);
    assert!(!first.unchanged);
    assert_eq!(first.pruned_count(), 0);

    scores[2] = 50;
    let second = tracker.observe("scores", &scores);
    assert!(!second.unchanged);
    assert_eq!(second.pruned_count(), 2);

    let third = tracker.observe("scores", &scores);
    assert!(third.unchanged);
}

#[test]
fn test_history_keeps_unpruned_tree() {
    let mut tracker = Tracker::default();
    let value = vec![1u8, 2];
    tracker.observe("v", &value);
    tracker.observe("v", &value);

    let last = tracker.last("v").unwrap();
    let NodeValue::List(children) = &last.value else {
        panic!("expected list");
    };
    assert!(children.iter().all(|c| c.metatype == Some(Metatype::Uint)));
}

#[test]
fn test_names_are_tracked_independently() {
    let mut tracker = Tracker::default();
    tracker.observe("a", &1i32);
    let b = tracker.observe("b", &1i32);
    assert!(!b.unchanged);
    assert!(tracker.observe("a", &1i32).unchanged);
    assert_eq!(tracker.len(), 2);
}

#[test]
fn test_observe_logs_end_event() {
    let capture = init_test_capture();
    let mut tracker = Tracker::default();
    tracker.observe("tracker_log_unique_var", &10i64);

    let end = capture
        .events_for("observe")
        .into_iter()
        .find(|e| {
            e.event.as_deref() == Some(EVENT_END)
                && e.field("var_name") == Some("tracker_log_unique_var")
        })
        .expect("observe should log its end");
    assert_eq!(end.field("unchanged"), Some("false"));
}
