mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use board_sync::{HandlerRegistry, InputBoard, ItemHandler, Workspace, STATUS_COLUMN_TITLE};

use crate::common::{ack, detail, identity, listing, ScriptedRemote};

struct NoteTaker {
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl ItemHandler for NoteTaker {
    async fn handle(&self, item_name: String) {
        self.seen.lock().unwrap().push(item_name);
    }
}

fn empty_snapshot() -> Value {
    json!({ "boards": [{ "id": "6000", "items": [] }] })
}

#[tokio::test]
async fn input_board_detects_items_and_reports_completion() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut script = vec![
        listing("Research", "Research Board", "4242"),
        detail("4242"),
        identity("4242", "Research"),
        // InputBoard::create
        json!({ "create_board": { "id": "6000" } }),
        json!({ "boards": [{ "id": "6000", "groups": [{ "id": "default", "title": "Group Title" }] }] }),
        ack(),
        json!({ "create_column": { "id": "col_exec" } }),
        // first poll finds one fresh item
        json!({ "boards": [{ "id": "6000", "items": [{
            "id": "it_90",
            "name": "hello",
            "group": { "id": "grp_in", "title": "Input Group 1" },
            "column_values": [{ "title": "Execution Status", "value": null }]
        }] }] }),
        ack(), // in-progress marker
        ack(), // done marker from the handler unit
    ];
    // Keep a few quiet polls in reserve while the test winds down.
    script.extend((0..5).map(|_| empty_snapshot()));

    let remote = Arc::new(ScriptedRemote::new(script));
    let workspace = Workspace::with_remote("Research".to_string(), 500, remote.clone())
        .await
        .unwrap();

    let handler = Arc::new(NoteTaker {
        seen: Mutex::new(Vec::new()),
    });
    let mut handlers: HandlerRegistry = HandlerRegistry::new();
    handlers.insert("Input Group 1".to_string(), handler.clone());

    let mut input_board = InputBoard::create(
        &workspace,
        "Input",
        handlers,
        Duration::from_millis(50),
    )
    .await
    .unwrap();

    assert_eq!(input_board.status_column_id(), "col_exec");
    let status_column = input_board
        .board()
        .column(STATUS_COLUMN_TITLE)
        .await
        .unwrap();
    assert_eq!(status_column.column_id(), "col_exec");
    assert!(!input_board.is_running());

    input_board.start();
    assert!(input_board.is_running());

    remote
        .wait_for_query(r#"item_id: it_90, column_id: "col_exec", value: "{\"index\":0}""#)
        .await;
    remote
        .wait_for_query(r#"item_id: it_90, column_id: "col_exec", value: "{\"index\":1}""#)
        .await;
    assert_eq!(handler.seen.lock().unwrap().clone(), vec!["hello"]);
}

#[tokio::test]
async fn mark_done_uses_the_full_reporting_contract() {
    let script = vec![
        listing("Research", "Research Board", "4242"),
        detail("4242"),
        identity("4242", "Research"),
        json!({ "create_board": { "id": "6000" } }),
        json!({ "boards": [{ "id": "6000", "groups": [] }] }),
        json!({ "create_column": { "id": "col_exec" } }),
        ack(),
    ];
    let remote = Arc::new(ScriptedRemote::new(script));
    let workspace = Workspace::with_remote("Research".to_string(), 500, remote.clone())
        .await
        .unwrap();

    let input_board = InputBoard::create(
        &workspace,
        "Input",
        HandlerRegistry::new(),
        Duration::from_secs(1),
    )
    .await
    .unwrap();

    input_board.mark_done("it_55").await.unwrap();

    assert!(remote.queries().iter().any(|q| q.contains(
        r#"change_column_value (board_id: 6000, item_id: it_55, column_id: "col_exec", value: "{\"index\":1}""#
    )));
}
