//! Pipeline integration tests: explicit continuation, stop and failure
//! semantics, payload rewriting and context teardown.

#[path = "../support/mod.rs"]
mod support;

use std::sync::Arc;

use switchyard::{
    continue_pipeline, current_handler_index, in_pipeline, Container, ContextError, Handler,
    HandlerError, Hub, PipelineOutcome,
};

use support::{init_tracing, Recorder};

#[test]
fn every_handler_continues() {
    init_tracing();
    let hub = Hub::new();
    let log = Recorder::new();
    hub.on_pipeline("msg.in", 0, log.stage("route", true)).unwrap();
    hub.on_pipeline("msg.in", 5, log.stage("parse", true)).unwrap();
    hub.on_pipeline("msg.in", 10, log.stage("auth", true)).unwrap();

    let outcome = hub.run_pipeline("msg.in", &Container::wrap(()).unwrap());
    assert_eq!(outcome, PipelineOutcome::Completed { ran: 3 });
    assert_eq!(log.entries(), vec!["auth", "parse", "route"]);
}

#[test]
fn handler_without_continue_stops_silently() {
    init_tracing();
    let hub = Hub::new();
    let log = Recorder::new();
    hub.on_pipeline("msg.in", 10, log.stage("auth", true)).unwrap();
    hub.on_pipeline("msg.in", 5, log.stage("rate limit", false)).unwrap();
    hub.on_pipeline("msg.in", 0, log.stage("route", true)).unwrap();

    let outcome = hub.run_pipeline("msg.in", &Container::wrap(()).unwrap());
    assert_eq!(outcome, PipelineOutcome::Stopped { index: 1 });
    assert_eq!(outcome.handlers_run(), 2);
    assert_eq!(log.entries(), vec!["auth", "rate limit"]);
}

#[test]
fn failing_handler_breaks_the_chain() {
    let hub = Hub::new();
    let log = Recorder::new();
    hub.on_pipeline(
        "msg.in",
        1,
        Handler::payload(|_| Err(HandlerError::rejected("malformed"))),
    )
    .unwrap();
    hub.on_pipeline("msg.in", 0, log.stage("never", true)).unwrap();

    let outcome = hub.run_pipeline("msg.in", &Container::wrap(()).unwrap());
    assert_eq!(outcome, PipelineOutcome::Failed { index: 0 });
    assert!(log.entries().is_empty());
}

#[test]
fn context_is_cleared_after_a_panicking_handler() {
    let hub = Hub::new();
    hub.on_pipeline(
        "msg.in",
        0,
        Handler::payload(|_| {
            continue_pipeline()?;
            panic!("handler bug");
        }),
    )
    .unwrap();

    let outcome = hub.run_pipeline("msg.in", &Container::wrap(()).unwrap());
    assert_eq!(outcome, PipelineOutcome::Failed { index: 0 });
    assert!(!in_pipeline());
    assert_eq!(continue_pipeline(), Err(ContextError::NoPipeline));
}

#[test]
fn empty_pipeline_reports_empty() {
    let hub = Hub::new();
    assert_eq!(
        hub.run_pipeline("nothing", &Container::wrap(()).unwrap()),
        PipelineOutcome::Empty
    );
}

#[test]
fn handlers_rewrite_the_payload_in_order() {
    let hub = Hub::new();
    hub.on_pipeline(
        "msg.in",
        1,
        Handler::payload(|content| {
            content.update(|text: &mut String| *text = text.trim().to_string())?;
            continue_pipeline()?;
            Ok(())
        }),
    )
    .unwrap();
    hub.on_pipeline(
        "msg.in",
        0,
        Handler::payload(|content| {
            content.update(|text: &mut String| text.insert_str(0, "> "))?;
            continue_pipeline()?;
            Ok(())
        }),
    )
    .unwrap();

    let content = Container::wrap("  hi  ".to_string()).unwrap();
    hub.run_pipeline("msg.in", &content);
    assert_eq!(content.unwrap::<String>().unwrap().into_owned(), "> hi");
}

#[test]
fn pattern_pipeline_receives_routing_key() {
    let hub = Hub::new();
    let log = Recorder::new();
    let seen = log.clone();
    hub.on_pipeline_pattern(
        "cmd.*",
        0,
        Handler::routed(move |src, _| {
            seen.push(src);
            continue_pipeline()?;
            Ok(())
        }),
    )
    .unwrap();

    let outcome = hub.run_pipeline("cmd.help", &Container::wrap(()).unwrap());
    assert!(outcome.is_completed());
    assert_eq!(log.entries(), vec!["cmd.help"]);
}

#[test]
fn nested_pipeline_does_not_leak_continuation() {
    let hub = Arc::new(Hub::new());
    let log = Recorder::new();
    let weak = Arc::downgrade(&hub);
    hub.on_pipeline(
        "outer",
        1,
        Handler::payload(move |content| {
            if let Some(hub) = weak.upgrade() {
                // Inner stage continues; the outer frame must stay unset.
                hub.run_pipeline("inner", content);
            }
            Ok(())
        }),
    )
    .unwrap();
    hub.on_pipeline("outer", 0, log.stage("outer second", true)).unwrap();
    hub.on_pipeline("inner", 0, log.stage("inner", true)).unwrap();

    let outcome = hub.run_pipeline("outer", &Container::wrap(()).unwrap());
    assert_eq!(outcome, PipelineOutcome::Stopped { index: 0 });
    assert_eq!(log.entries(), vec!["inner"]);
}

#[test]
fn concurrent_pipelines_keep_their_own_flags() {
    let hub = Arc::new(Hub::new());
    hub.on_pipeline(
        "work",
        1,
        Handler::payload(|content| {
            let n = *content.unwrap::<u32>()?;
            assert_eq!(current_handler_index(), Some(0));
            if n % 2 == 0 {
                continue_pipeline()?;
            }
            Ok(())
        }),
    )
    .unwrap();
    hub.on_pipeline("work", 0, Handler::payload(|_| continue_pipeline().map_err(HandlerError::from)))
        .unwrap();

    let threads: Vec<_> = (0..8_u32)
        .map(|n| {
            let hub = Arc::clone(&hub);
            std::thread::spawn(move || (n, hub.run_pipeline("work", &Container::wrap(n).unwrap())))
        })
        .collect();
    for thread in threads {
        let (n, outcome) = thread.join().unwrap();
        if n % 2 == 0 {
            assert_eq!(outcome, PipelineOutcome::Completed { ran: 2 });
        } else {
            assert_eq!(outcome, PipelineOutcome::Stopped { index: 0 });
        }
    }
}
