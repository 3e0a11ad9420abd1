//! Adapter registry integration: liveness driven through an interceptor.

#[path = "../support/mod.rs"]
mod support;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use switchyard::adapters::{AdapterError, AdapterRegistry};
use switchyard::{Container, Hub};

use support::{init_tracing, Recorder};

#[test]
fn heartbeat_interceptor_refreshes_liveness() {
    init_tracing();
    let registry = Arc::new(AdapterRegistry::new());
    registry
        .register("telegram", "2.1.0", json!({ "bot": "@switchyard" }).as_object().cloned())
        .unwrap();
    let registered = registry.get("telegram").unwrap().last_heartbeat;

    let hub = Hub::new();
    let log = Recorder::new();
    hub.on_interceptor(
        "adapter.telegram.ping",
        0,
        registry.heartbeat_handler("telegram", "2.1.0"),
    )
    .unwrap();
    hub.on_event("adapter.telegram.ping", 0, log.consumer("pong")).unwrap();

    std::thread::sleep(Duration::from_millis(5));
    let delivery = hub.emit_event("adapter.telegram.ping", &Container::wrap(()).unwrap());
    assert!(!delivery.intercepted);
    assert_eq!(log.entries(), vec!["pong"]);

    let refreshed = registry.get("telegram").unwrap().last_heartbeat;
    assert!(refreshed > registered);
    assert_eq!(registry.active(Duration::from_secs(1)), vec!["telegram".to_string()]);
}

#[test]
fn stale_version_heartbeat_fails_without_blocking() {
    let registry = Arc::new(AdapterRegistry::new());
    registry.register("qq", "1.0.0", None).unwrap();
    let before = registry.get("qq").unwrap().last_heartbeat;

    let hub = Hub::new();
    hub.on_interceptor("adapter.qq.ping", 0, registry.heartbeat_handler("qq", "0.9.0"))
        .unwrap();

    let delivery = hub.emit_event("adapter.qq.ping", &Container::wrap(()).unwrap());
    assert!(!delivery.intercepted);
    assert_eq!(registry.get("qq").unwrap().last_heartbeat, before);
    assert_eq!(
        registry.heartbeat("qq", "0.9.0"),
        Err(AdapterError::VersionMismatch {
            expected: "1.0.0".into(),
            got: "0.9.0".into(),
        })
    );
}

#[test]
fn registry_is_shared_across_threads() {
    let registry = Arc::new(AdapterRegistry::new());
    let threads: Vec<_> = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || registry.register(&format!("adapter-{}", i), "1", None))
        })
        .collect();
    for thread in threads {
        thread.join().unwrap().unwrap();
    }
    assert_eq!(registry.list().len(), 4);
    assert_eq!(registry.active_default().len(), 4);
}
