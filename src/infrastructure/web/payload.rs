//! Response payload shapes.
//!
//! Deserialization targets for the `data` payload of each remote operation.
//! Only the fields the sync layer consumes are modeled; anything beyond error
//! detection is the remote service's business.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::common::errors::{Result, SyncError};

/// Decode a `data` payload into the expected shape, naming the operation in
/// the error when the shape does not match.
pub fn decode<T: DeserializeOwned>(data: Value, context: &str) -> Result<T> {
    serde_json::from_value(data).map_err(|e| SyncError::MalformedResponse {
        detail: format!("{}: {}", context, e),
    })
}

#[derive(Debug, Deserialize)]
pub struct BoardsEnvelope {
    pub boards: Vec<BoardSummary>,
}

#[derive(Debug, Deserialize)]
pub struct BoardSummary {
    pub id: String,
    pub name: String,
    /// Boards outside any workspace come back with a null workspace.
    #[serde(default)]
    pub workspace: Option<WorkspaceRef>,
}

#[derive(Debug, Deserialize)]
pub struct WorkspaceRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct BoardDetailEnvelope {
    pub boards: Vec<BoardDetail>,
}

#[derive(Debug, Deserialize)]
pub struct BoardDetail {
    pub id: String,
    #[serde(default)]
    pub groups: Vec<GroupPayload>,
    #[serde(default)]
    pub columns: Vec<ColumnPayload>,
    #[serde(default)]
    pub items: Vec<ItemPayload>,
}

#[derive(Debug, Deserialize)]
pub struct GroupPayload {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct ColumnPayload {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ItemPayload {
    pub id: String,
    pub name: String,
    pub group: GroupPayload,
    #[serde(default)]
    pub column_values: Vec<ColumnValuePayload>,
}

#[derive(Debug, Deserialize)]
pub struct ColumnValuePayload {
    pub id: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Item shape returned by the dispatcher's poll query, which fetches raw
/// column `value`s rather than display text.
#[derive(Debug, Deserialize)]
pub struct PollEnvelope {
    pub boards: Vec<PollBoard>,
}

#[derive(Debug, Deserialize)]
pub struct PollBoard {
    pub id: String,
    #[serde(default)]
    pub items: Vec<PollItem>,
}

#[derive(Debug, Deserialize)]
pub struct PollItem {
    pub id: String,
    pub name: String,
    pub group: GroupPayload,
    #[serde(default)]
    pub column_values: Vec<PollColumnValue>,
}

#[derive(Debug, Deserialize)]
pub struct PollColumnValue {
    pub title: String,
    #[serde(default)]
    pub value: Option<Value>,
}

impl PollItem {
    /// An item is unprocessed iff its first column value is empty or absent.
    pub fn is_unprocessed(&self) -> bool {
        match self.column_values.first() {
            None => true,
            Some(cv) => match &cv.value {
                None | Some(Value::Null) => true,
                Some(Value::String(s)) => s.is_empty(),
                Some(_) => false,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatedId {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateBoardEnvelope {
    pub create_board: CreatedId,
}

#[derive(Debug, Deserialize)]
pub struct CreateGroupEnvelope {
    pub create_group: CreatedId,
}

#[derive(Debug, Deserialize)]
pub struct CreateColumnEnvelope {
    pub create_column: CreatedId,
}

#[derive(Debug, Deserialize)]
pub struct CreateItemEnvelope {
    pub create_item: CreatedId,
}
