use serde::{Deserialize, Serialize};
use switchyard::{Container, ContainerError, Discipline, Handler, Hub};

use crate::support::init_tracing;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ChatMessage {
    group: u64,
    sender: String,
    text: String,
}

fn message() -> ChatMessage {
    ChatMessage {
        group: 42,
        sender: "alice".into(),
        text: "hello".into(),
    }
}

#[test]
fn every_unwrap_is_an_independent_copy() {
    init_tracing();
    let container = Container::wrap(message()).unwrap();
    assert_eq!(container.discipline(), Discipline::ByValue);

    let mut first = container.unwrap::<ChatMessage>().unwrap().into_owned();
    first.text.push_str(" (edited)");

    let second = container.unwrap::<ChatMessage>().unwrap();
    assert!(!second.is_shared());
    assert_eq!(*second, message());
}

#[test]
fn consumers_receive_copies() {
    init_tracing();
    let hub = Hub::new();
    hub.on_event(
        "msg.received",
        1,
        Handler::payload(|content| {
            let mut msg = content.unwrap::<ChatMessage>()?.into_owned();
            msg.sender = "mallory".into();
            Ok(())
        }),
    )
    .unwrap();
    hub.on_event(
        "msg.received",
        0,
        Handler::payload(|content| {
            let msg = content.unwrap::<ChatMessage>()?;
            assert_eq!(msg.sender, "alice");
            Ok(())
        }),
    )
    .unwrap();

    let delivery = hub.emit_event("msg.received", &Container::wrap(message()).unwrap());
    assert_eq!(delivery.delivered, 2);
    assert_eq!(delivery.failed, 0);
}

#[test]
fn wrong_type_is_reported() {
    let container = Container::wrap(message()).unwrap();
    let err = container.unwrap::<String>().unwrap_err();
    assert!(matches!(err, ContainerError::TypeMismatch { .. }));
    assert_eq!(container.payload_type().short_name(), "ChatMessage");
}

#[test]
fn clones_taken_before_replace_keep_the_old_value() {
    let container = Container::wrap(1_u32).unwrap();
    let before = container.clone();
    container.replace(2_u32).unwrap();

    assert_eq!(*container.unwrap::<u32>().unwrap(), 2);
    assert_eq!(*before.unwrap::<u32>().unwrap(), 1);
}
