use switchyard::{Container, ContainerError, Handler, HandlerError, Hub, RegistrationError};

use crate::support::{init_tracing, Recorder};

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn higher_priority_runs_first() {
    init_tracing();
    let hub = Hub::new();
    let log = Recorder::new();
    hub.on_event("user.login", 1, log.consumer("one")).unwrap();
    hub.on_event("user.login", 10, log.consumer("ten")).unwrap();
    hub.on_event("user.login", 5, log.consumer("five")).unwrap();

    hub.emit_event("user.login", &Container::wrap("bob".to_string()).unwrap());
    assert_eq!(log.entries(), vec!["ten", "five", "one"]);
}

#[test]
fn equal_priority_keeps_registration_order() {
    let hub = Hub::new();
    let log = Recorder::new();
    for tag in ["a", "b", "c", "d"] {
        hub.on_event("tick", 0, log.consumer(tag)).unwrap();
    }
    hub.emit_event("tick", &Container::wrap(()).unwrap());
    assert_eq!(log.entries(), vec!["a", "b", "c", "d"]);
}

#[test]
fn negative_priority_runs_last() {
    let hub = Hub::new();
    let log = Recorder::new();
    hub.on_event("tick", -1, log.consumer("late")).unwrap();
    hub.on_event("tick", 0, log.consumer("default")).unwrap();
    hub.emit_event("tick", &Container::wrap(()).unwrap());
    assert_eq!(log.entries(), vec!["default", "late"]);
}

// ============================================================================
// Patterns
// ============================================================================

#[test]
fn pattern_matches_one_segment() {
    init_tracing();
    let hub = Hub::new();
    let log = Recorder::new();
    hub.on_event_pattern("test.*.event", 0, log.routed("glob")).unwrap();

    let content = Container::wrap(1_u8).unwrap();
    assert_eq!(hub.emit_event("test.foo.event", &content).delivered, 1);
    assert_eq!(hub.emit_event("test.bar.event", &content).delivered, 1);
    assert!(hub.emit_event("test.foo.bar.event", &content).is_unrouted());
    assert!(hub.emit_event("test.event", &content).is_unrouted());
    assert_eq!(
        log.entries(),
        vec!["glob:test.foo.event", "glob:test.bar.event"]
    );
}

#[test]
fn exact_and_pattern_consumers_interleave_by_priority() {
    let hub = Hub::new();
    let log = Recorder::new();
    hub.on_event("msg.send-telegram", 0, log.consumer("exact")).unwrap();
    hub.on_event_pattern("msg.send-*", 5, log.routed("glob")).unwrap();

    hub.emit_event("msg.send-telegram", &Container::wrap(()).unwrap());
    assert_eq!(log.entries(), vec!["glob:msg.send-telegram", "exact"]);
}

#[test]
fn pattern_rejects_payload_only_handler() {
    let hub = Hub::new();
    let err = hub
        .on_event_pattern("user.*", 0, Handler::payload(|_| Ok(())))
        .unwrap_err();
    assert!(matches!(err, RegistrationError::MissingRoutingKey { ref route } if route == "user.*"));
    assert_eq!(hub.events().consumer_count(), 0);
}

// ============================================================================
// Failure isolation
// ============================================================================

#[test]
fn second_of_three_failing_does_not_stop_the_third() {
    init_tracing();
    let hub = Hub::new();
    let log = Recorder::new();
    hub.on_event("evt", 3, log.consumer("first")).unwrap();
    hub.on_event(
        "evt",
        2,
        Handler::payload(|_| Err(HandlerError::rejected("second fails"))),
    )
    .unwrap();
    hub.on_event("evt", 1, log.consumer("third")).unwrap();

    let delivery = hub.emit_event("evt", &Container::wrap(()).unwrap());
    assert_eq!(delivery.delivered, 2);
    assert_eq!(delivery.failed, 1);
    assert_eq!(log.entries(), vec!["first", "third"]);
}

#[test]
fn panicking_consumer_is_isolated() {
    let hub = Hub::new();
    let log = Recorder::new();
    hub.on_event("evt", 1, Handler::payload(|_| panic!("plugin crashed")))
        .unwrap();
    hub.on_event("evt", 0, log.consumer("survivor")).unwrap();

    let delivery = hub.emit_event("evt", &Container::wrap(()).unwrap());
    assert_eq!(delivery.failed, 1);
    assert_eq!(log.entries(), vec!["survivor"]);
}

#[test]
fn wrong_payload_type_counts_as_failure() {
    let hub = Hub::new();
    hub.on_event(
        "evt",
        0,
        Handler::payload(|content| {
            content.unwrap::<u64>()?;
            Ok(())
        }),
    )
    .unwrap();
    let delivery = hub.emit_event("evt", &Container::wrap("not a number".to_string()).unwrap());
    assert_eq!(delivery.failed, 1);
}

// ============================================================================
// Read-only delivery
// ============================================================================

#[test]
fn notify_consumers_cannot_replace() {
    let hub = Hub::new();
    let outcome = Recorder::new();
    let seen = outcome.clone();
    hub.on_event(
        "evt",
        0,
        Handler::payload(move |content| {
            match content.replace(99_u32) {
                Err(ContainerError::Sealed) => seen.push("sealed"),
                other => seen.push(format!("{:?}", other)),
            }
            Ok(())
        }),
    )
    .unwrap();

    let content = Container::wrap(1_u32).unwrap();
    hub.emit_event("evt", &content);
    assert_eq!(outcome.entries(), vec!["sealed"]);
    assert_eq!(*content.unwrap::<u32>().unwrap(), 1);
}
