mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use board_sync::{HandlerRegistry, ItemHandler, PollingDispatcher, SyncError};

use crate::common::{ack, ScriptedRemote};

struct RecordingHandler {
    invocations: Mutex<Vec<String>>,
}

impl RecordingHandler {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            invocations: Mutex::new(Vec::new()),
        })
    }

    fn invocations(&self) -> Vec<String> {
        self.invocations.lock().unwrap().clone()
    }
}

#[async_trait]
impl ItemHandler for RecordingHandler {
    async fn handle(&self, item_name: String) {
        self.invocations.lock().unwrap().push(item_name);
    }
}

fn poll_item(id: &str, name: &str, group: &str, status_value: Value) -> Value {
    json!({
        "id": id,
        "name": name,
        "group": { "id": "grp_input", "title": group },
        "column_values": [{ "title": "Execution Status", "value": status_value }]
    })
}

fn snapshot(items: Vec<Value>) -> Value {
    json!({ "boards": [{ "id": "6000", "items": items }] })
}

fn dispatcher(remote: Arc<ScriptedRemote>, handlers: HandlerRegistry) -> PollingDispatcher {
    PollingDispatcher::new(
        remote,
        "6000".to_string(),
        "col_status".to_string(),
        Arc::new(handlers),
        Duration::from_secs(1),
    )
}

#[tokio::test]
async fn only_items_with_empty_first_value_are_dispatched() {
    let _ = env_logger::builder().is_test(true).try_init();
    let remote = Arc::new(ScriptedRemote::new(vec![
        snapshot(vec![
            poll_item("1", "one", "Input Group 1", Value::Null),
            poll_item("2", "two", "Input Group 1", json!("{\"index\":0}")),
            poll_item("3", "three", "Input Group 1", json!("")),
            poll_item("4", "four", "Input Group 1", json!("{\"index\":1}")),
        ]),
        ack(),
        ack(),
        ack(),
        ack(),
    ]));
    let handler = RecordingHandler::new();
    let mut handlers: HandlerRegistry = HandlerRegistry::new();
    handlers.insert("Input Group 1".to_string(), handler.clone());

    let spawned = dispatcher(remote.clone(), handlers).poll_once().await.unwrap();

    assert_eq!(spawned, 2);
    let working_marks = remote
        .queries()
        .iter()
        .filter(|q| q.contains(r#"value: "{\"index\":0}""#))
        .count();
    assert_eq!(working_marks, 2);

    // Both handler units eventually report completion.
    remote
        .wait_for_query(r#"item_id: 1, column_id: "col_status", value: "{\"index\":1}""#)
        .await;
    remote
        .wait_for_query(r#"item_id: 3, column_id: "col_status", value: "{\"index\":1}""#)
        .await;
    let mut invoked = handler.invocations();
    invoked.sort();
    assert_eq!(invoked, vec!["one", "three"]);
}

#[tokio::test]
async fn handler_runs_then_done_marker_is_reported() {
    let remote = Arc::new(ScriptedRemote::new(vec![
        snapshot(vec![poll_item("42", "hello", "Input Group 1", Value::Null)]),
        ack(),
        ack(),
    ]));
    let handler = RecordingHandler::new();
    let mut handlers: HandlerRegistry = HandlerRegistry::new();
    handlers.insert("Input Group 1".to_string(), handler.clone());

    let spawned = dispatcher(remote.clone(), handlers).poll_once().await.unwrap();
    assert_eq!(spawned, 1);

    // In-progress marker goes out before the handler unit reports done.
    let queries = remote.queries();
    assert!(queries.iter().any(|q| {
        q.contains("change_column_value (board_id: 6000, item_id: 42, column_id: \"col_status\"")
            && q.contains(r#"{\"index\":0}"#)
    }));

    remote
        .wait_for_query(r#"item_id: 42, column_id: "col_status", value: "{\"index\":1}""#)
        .await;
    assert_eq!(handler.invocations(), vec!["hello"]);
}

#[tokio::test]
async fn unregistered_group_fails_fast_without_touching_the_item() {
    let remote = Arc::new(ScriptedRemote::new(vec![snapshot(vec![poll_item(
        "9",
        "stray",
        "Unknown Group",
        Value::Null,
    )])]));

    let result = dispatcher(remote.clone(), HandlerRegistry::new())
        .poll_once()
        .await;

    match result {
        Err(SyncError::UnregisteredGroup { group }) => assert_eq!(group, "Unknown Group"),
        other => panic!("expected UnregisteredGroup, got {:?}", other.map(|_| ())),
    }
    // The item was never marked in-progress.
    assert!(!remote
        .queries()
        .iter()
        .any(|q| q.contains("change_column_value")));
}

#[tokio::test]
async fn processed_items_trigger_nothing() {
    let remote = Arc::new(ScriptedRemote::new(vec![snapshot(vec![poll_item(
        "5",
        "finished",
        "Input Group 1",
        json!("{\"index\":1}"),
    )])]));
    let handler = RecordingHandler::new();
    let mut handlers: HandlerRegistry = HandlerRegistry::new();
    handlers.insert("Input Group 1".to_string(), handler.clone());

    let spawned = dispatcher(remote.clone(), handlers).poll_once().await.unwrap();

    assert_eq!(spawned, 0);
    assert_eq!(remote.queries().len(), 1);
    assert!(handler.invocations().is_empty());
}
