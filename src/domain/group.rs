//! Group entity.

use std::collections::HashMap;
use std::sync::Arc;

use getset::Getters;
use log::debug;
use tokio::sync::RwLock;

use crate::common::errors::Result;
use crate::domain::board::SharedColumns;
use crate::domain::item::{ColumnValue, Item};
use crate::domain::remote::SharedRemote;
use crate::infrastructure::web::payload::{self, CreateItemEnvelope, GroupPayload};
use crate::infrastructure::web::query;

pub type SharedItems = Arc<RwLock<HashMap<String, Item>>>;

/// A named partition of items within a board. The items map carries its own
/// lock because dispatcher and handler units read it while the sync path
/// mutates it.
#[derive(Clone, Getters)]
#[getset(get = "pub")]
pub struct Group {
    title: String,
    group_id: String,
    /// Back-reference to the owning board, by remote id.
    board_id: String,
    items: SharedItems,
    /// Shared view of the owning board's column registry, used to resolve
    /// column titles when creating items.
    #[getset(skip)]
    columns: SharedColumns,
    #[getset(skip)]
    remote: SharedRemote,
}

impl Group {
    pub(crate) fn new(
        remote: SharedRemote,
        board_id: String,
        columns: SharedColumns,
        title: String,
        group_id: String,
    ) -> Self {
        Self {
            title,
            group_id,
            board_id,
            items: Arc::new(RwLock::new(HashMap::new())),
            columns,
            remote,
        }
    }

    pub(crate) fn hydrate(
        remote: SharedRemote,
        board_id: String,
        columns: SharedColumns,
        payload: GroupPayload,
    ) -> Self {
        Self::new(remote, board_id, columns, payload.title, payload.id)
    }

    /// Register an already-hydrated item. Name-keyed, last write wins.
    pub(crate) async fn attach(&self, item: Item) {
        self.items.write().await.insert(item.name().clone(), item);
    }

    pub async fn item(&self, name: &str) -> Option<Item> {
        self.items.read().await.get(name).cloned()
    }

    /// Create an item remotely and register it in this group. `values` maps
    /// column titles to their initial values and may be empty; each call gets
    /// its own slice, nothing is shared across invocations.
    pub async fn create_item(&self, name: &str, values: &[(&str, ColumnValue)]) -> Result<Item> {
        let column_values = Item::encode_values(&self.columns, values).await?;
        let data = self
            .remote
            .execute(&query::create_item(
                &self.board_id,
                &self.group_id,
                name,
                &column_values,
            ))
            .await?;
        let created: CreateItemEnvelope = payload::decode(data, "create_item")?;
        debug!(
            "created item '{}' ({}) in group '{}'",
            name, created.create_item.id, self.title
        );
        let item = Item::new(
            self.remote.clone(),
            self.board_id.clone(),
            self.group_id.clone(),
            self.columns.clone(),
            name.to_string(),
            created.create_item.id,
        );
        self.items.write().await.insert(name.to_string(), item.clone());
        Ok(item)
    }
}
