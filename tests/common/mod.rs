//! Shared test support: a scripted remote that replays canned `data`
//! payloads and records every query it is asked to run.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use board_sync::{Remote, Result};

pub struct ScriptedRemote {
    responses: Mutex<VecDeque<Value>>,
    queries: Mutex<Vec<String>>,
    files: Mutex<Vec<PathBuf>>,
}

impl ScriptedRemote {
    pub fn new(responses: Vec<Value>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            queries: Mutex::new(Vec::new()),
            files: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn files(&self) -> Vec<PathBuf> {
        self.files.lock().unwrap().clone()
    }

    /// Wait until some recorded query contains `needle`; spawned handler
    /// units report completion asynchronously.
    pub async fn wait_for_query(&self, needle: &str) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
        loop {
            if self.queries().iter().any(|q| q.contains(needle)) {
                return;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "timed out waiting for query containing: {}",
                needle
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    fn next_response(&self) -> Value {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("scripted remote exhausted")
    }
}

#[async_trait]
impl Remote for ScriptedRemote {
    async fn execute(&self, query: &str) -> Result<Value> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self.next_response())
    }

    async fn execute_file(&self, query: &str, file_path: &Path) -> Result<Value> {
        self.queries.lock().unwrap().push(query.to_string());
        self.files.lock().unwrap().push(file_path.to_path_buf());
        Ok(self.next_response())
    }
}

/// Generic acknowledgement payload for mutations whose response the sync
/// layer does not inspect.
pub fn ack() -> Value {
    json!({ "change_column_value": { "id": "1" } })
}

/// Board listing with one board inside the target workspace and one outside.
pub fn listing(workspace: &str, board: &str, board_id: &str) -> Value {
    json!({
        "boards": [
            {
                "id": board_id,
                "name": board,
                "workspace": { "id": "777", "name": workspace }
            },
            {
                "id": "9900",
                "name": "Someone else's board",
                "workspace": { "id": "888", "name": "Other workspace" }
            },
            {
                "id": "9901",
                "name": "Orphan board",
                "workspace": null
            }
        ]
    })
}

pub fn identity(board_id: &str, workspace: &str) -> Value {
    json!({
        "boards": [
            {
                "id": board_id,
                "name": "whatever",
                "workspace": { "id": "777", "name": workspace }
            }
        ]
    })
}

/// Detail payload with 2 columns, 3 groups and 5 items spread across the
/// groups.
pub fn detail(board_id: &str) -> Value {
    json!({
        "boards": [
            {
                "id": board_id,
                "name": "Research Board",
                "columns": [
                    { "id": "col_status", "title": "Status", "type": "status", "description": "" },
                    { "id": "col_notes", "title": "Notes", "type": "text", "description": "free text" }
                ],
                "groups": [
                    { "id": "grp_a", "title": "Group A" },
                    { "id": "grp_b", "title": "Group B" },
                    { "id": "grp_c", "title": "Group C" }
                ],
                "items": [
                    {
                        "id": "it_1", "name": "alpha",
                        "group": { "id": "grp_a", "title": "Group A" },
                        "column_values": [
                            { "id": "col_status", "text": "Done" },
                            { "id": "col_notes", "text": "first" }
                        ]
                    },
                    {
                        "id": "it_2", "name": "beta",
                        "group": { "id": "grp_a", "title": "Group A" },
                        "column_values": []
                    },
                    {
                        "id": "it_3", "name": "gamma",
                        "group": { "id": "grp_b", "title": "Group B" },
                        "column_values": [{ "id": "col_notes", "text": null }]
                    },
                    {
                        "id": "it_4", "name": "delta",
                        "group": { "id": "grp_b", "title": "Group B" },
                        "column_values": []
                    },
                    {
                        "id": "it_5", "name": "epsilon",
                        "group": { "id": "grp_c", "title": "Group C" },
                        "column_values": []
                    }
                ]
            }
        ]
    })
}
