//! Integration tests for store change notifications.
#![cfg(feature = "emitter")]

use std::sync::mpsc::{self, Receiver};
use std::sync::Mutex;
use std::time::Duration;

use jsonapi_store::emitter::{DESTROYED, RESET, SYNCED};
use jsonapi_store::Store;
use serde_json::json;

fn listen(store: &Store, event: &str) -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    store
        .on(event, move |data: String| {
            let _ = tx.lock().map(|tx| tx.send(data));
        })
        .unwrap();
    rx
}

fn drain(rx: &Receiver<String>, expected: usize) -> Vec<String> {
    // EventEmitter is async, collect from its listener threads
    let mut received: Vec<String> = (0..expected)
        .filter_map(|_| rx.recv_timeout(Duration::from_secs(1)).ok())
        .collect();
    received.sort();
    received
}

#[test]
fn sync_emits_once_per_synced_record() {
    let store = Store::new();
    let synced = listen(&store, SYNCED);

    store
        .sync_value(json!({
            "data": {
                "type": "article", "id": "1",
                "relationships": { "author": { "data": { "type": "user", "id": "1" } } }
            },
            "included": [{ "type": "user", "id": "1" }]
        }))
        .unwrap();

    assert_eq!(drain(&synced, 2), ["article:1", "user:1"]);
    assert!(synced.recv_timeout(Duration::from_millis(100)).is_err());
}

#[test]
fn destroy_and_reset_emit() {
    let store = Store::new();
    let destroyed = listen(&store, DESTROYED);
    let reset = listen(&store, RESET);

    store
        .sync_value(json!({ "data": { "type": "user", "id": "1" } }))
        .unwrap();
    let user = store.find("user", "1").unwrap().unwrap();
    store.destroy(&user).unwrap();
    store.destroy(&user).unwrap();
    store.reset().unwrap();

    assert_eq!(drain(&destroyed, 1), ["user:1"]);
    assert!(destroyed.recv_timeout(Duration::from_millis(100)).is_err());
    assert_eq!(drain(&reset, 1), [""]);
}

#[test]
fn error_documents_emit_nothing() {
    let store = Store::new();
    let synced = listen(&store, SYNCED);

    store
        .sync_value(json!({
            "errors": [{ "status": "404" }],
            "data": { "type": "user", "id": "1" }
        }))
        .unwrap();

    assert!(synced.recv_timeout(Duration::from_millis(100)).is_err());
}
