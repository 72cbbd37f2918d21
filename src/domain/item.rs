//! Item entity.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use getset::Getters;
use serde_json::{json, Map, Value};

use crate::common::errors::{Result, SyncError};
use crate::domain::board::SharedColumns;
use crate::domain::remote::SharedRemote;
use crate::infrastructure::web::payload::ItemPayload;
use crate::infrastructure::web::query;

/// A value assigned to a column at item creation. Scalars are quoted as
/// text; structured values (link or rating payloads) are serialized as
/// nested objects.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Text(String),
    Structured(Value),
}

impl ColumnValue {
    pub(crate) fn to_json(&self) -> Value {
        match self {
            ColumnValue::Text(text) => Value::String(text.clone()),
            ColumnValue::Structured(value) => value.clone(),
        }
    }
}

impl From<&str> for ColumnValue {
    fn from(text: &str) -> Self {
        ColumnValue::Text(text.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(text: String) -> Self {
        ColumnValue::Text(text)
    }
}

impl From<Value> for ColumnValue {
    fn from(value: Value) -> Self {
        ColumnValue::Structured(value)
    }
}

/// A row belonging to exactly one group. `column_values` is the locally
/// cached snapshot keyed by remote column id; it reflects the hydration
/// moment, not live remote state.
#[derive(Clone, Getters)]
#[getset(get = "pub")]
pub struct Item {
    name: String,
    item_id: String,
    board_id: String,
    group_id: String,
    column_values: HashMap<String, String>,
    #[getset(skip)]
    columns: SharedColumns,
    #[getset(skip)]
    remote: SharedRemote,
}

impl Item {
    pub(crate) fn new(
        remote: SharedRemote,
        board_id: String,
        group_id: String,
        columns: SharedColumns,
        name: String,
        item_id: String,
    ) -> Self {
        Self {
            name,
            item_id,
            board_id,
            group_id,
            column_values: HashMap::new(),
            columns,
            remote,
        }
    }

    pub(crate) fn hydrate(
        remote: SharedRemote,
        board_id: String,
        group_id: String,
        columns: SharedColumns,
        payload: ItemPayload,
    ) -> Self {
        let column_values = payload
            .column_values
            .into_iter()
            .map(|cv| (cv.id, cv.text.unwrap_or_default()))
            .collect();
        Self {
            name: payload.name,
            item_id: payload.id,
            board_id,
            group_id,
            column_values,
            columns,
            remote,
        }
    }

    /// Serialize (column title, value) pairs into the column_values payload
    /// of a create_item mutation, resolving titles to remote column ids.
    pub(crate) async fn encode_values(
        columns: &SharedColumns,
        values: &[(&str, ColumnValue)],
    ) -> Result<Value> {
        let mut payload = Map::new();
        let columns = columns.read().await;
        for (title, value) in values {
            let column = columns.get(*title).ok_or_else(|| SyncError::UnknownColumn {
                title: title.to_string(),
            })?;
            payload.insert(column.column_id().clone(), value.to_json());
        }
        Ok(Value::Object(payload))
    }

    async fn column_id(&self, title: &str) -> Result<String> {
        self.columns
            .read()
            .await
            .get(title)
            .map(|column| column.column_id().clone())
            .ok_or_else(|| SyncError::UnknownColumn {
                title: title.to_string(),
            })
    }

    /// Set a column of this item to an arbitrary structured value.
    pub async fn change_column_value(&self, column_title: &str, value: &Value) -> Result<()> {
        let column_id = self.column_id(column_title).await?;
        self.remote
            .execute(&query::change_column_value(
                &self.board_id,
                &self.item_id,
                &column_id,
                value,
            ))
            .await?;
        Ok(())
    }

    /// Post a comment to the item's update feed.
    pub async fn add_update(&self, body: &str) -> Result<()> {
        self.remote
            .execute(&query::create_update(&self.item_id, body))
            .await?;
        Ok(())
    }

    /// Set a link column. The description defaults to the url itself.
    pub async fn set_link(
        &self,
        column_title: &str,
        url: &str,
        description: Option<&str>,
    ) -> Result<()> {
        let text = description.unwrap_or(url);
        self.change_column_value(column_title, &json!({ "url": url, "text": text }))
            .await
    }

    pub async fn set_rating(&self, column_title: &str, rating: u8) -> Result<()> {
        self.change_column_value(column_title, &json!({ "rating": rating }))
            .await
    }

    /// Upload a single file to a file column.
    pub async fn upload_file(&self, column_title: &str, file_path: &Path) -> Result<()> {
        let column_id = self.column_id(column_title).await?;
        self.remote
            .execute_file(
                &query::add_file_to_column(&self.item_id, &column_id),
                file_path,
            )
            .await?;
        Ok(())
    }

    /// Upload several files to the same column, one request per file.
    pub async fn upload_files(&self, column_title: &str, file_paths: &[PathBuf]) -> Result<()> {
        for file_path in file_paths {
            self.upload_file(column_title, file_path).await?;
        }
        Ok(())
    }
}
