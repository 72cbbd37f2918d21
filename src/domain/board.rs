//! Board entity.

use std::collections::HashMap;
use std::sync::Arc;

use getset::Getters;
use log::debug;
use tokio::sync::RwLock;

use crate::common::errors::{Result, SyncError};
use crate::domain::column::{Column, ColumnKind};
use crate::domain::group::Group;
use crate::domain::item::Item;
use crate::domain::remote::SharedRemote;
use crate::infrastructure::web::payload::{
    self, BoardDetail, CreateColumnEnvelope, CreateGroupEnvelope,
};
use crate::infrastructure::web::query;

pub type SharedColumns = Arc<RwLock<HashMap<String, Column>>>;
pub type SharedGroups = Arc<RwLock<HashMap<String, Group>>>;

/// A titled table of grouped items with typed columns. Each mapping sits
/// behind its own lock: the sync path mutates them while dispatcher and
/// handler units read them.
#[derive(Clone, Getters)]
#[getset(get = "pub")]
pub struct Board {
    title: String,
    board_id: String,
    columns: SharedColumns,
    groups: SharedGroups,
    #[getset(skip)]
    remote: SharedRemote,
}

impl Board {
    pub(crate) fn new(remote: SharedRemote, title: String, board_id: String) -> Self {
        Self {
            title,
            board_id,
            columns: Arc::new(RwLock::new(HashMap::new())),
            groups: Arc::new(RwLock::new(HashMap::new())),
            remote,
        }
    }

    /// Build a board from a remote detail payload. Columns first, then
    /// groups, then items; items attach to the group named in their payload
    /// entry, which must already exist.
    pub(crate) async fn hydrate(
        remote: SharedRemote,
        title: String,
        detail: BoardDetail,
    ) -> Result<Self> {
        let board = Self::new(remote, title, detail.id);

        {
            let mut columns = board.columns.write().await;
            for column in detail.columns {
                let column = Column::hydrate(board.board_id.clone(), column);
                columns.insert(column.title().clone(), column);
            }
        }

        let mut groups = board.groups.write().await;
        for group in detail.groups {
            let group = Group::hydrate(
                board.remote.clone(),
                board.board_id.clone(),
                board.columns.clone(),
                group,
            );
            groups.insert(group.title().clone(), group);
        }

        for item in detail.items {
            let group =
                groups
                    .get(&item.group.title)
                    .ok_or_else(|| SyncError::MalformedResponse {
                        detail: format!(
                            "item '{}' references unknown group '{}'",
                            item.name, item.group.title
                        ),
                    })?;
            let item = Item::hydrate(
                board.remote.clone(),
                board.board_id.clone(),
                group.group_id().clone(),
                board.columns.clone(),
                item,
            );
            group.attach(item).await;
        }
        drop(groups);

        Ok(board)
    }

    pub(crate) fn remote(&self) -> &SharedRemote {
        &self.remote
    }

    pub async fn group(&self, title: &str) -> Option<Group> {
        self.groups.read().await.get(title).cloned()
    }

    pub async fn column(&self, title: &str) -> Option<Column> {
        self.columns.read().await.get(title).cloned()
    }

    /// Create a group remotely; its id is known before this returns.
    /// Title-keyed, last write wins.
    pub async fn create_group(&self, title: &str) -> Result<Group> {
        let data = self
            .remote
            .execute(&query::create_group(&self.board_id, title))
            .await?;
        let created: CreateGroupEnvelope = payload::decode(data, "create_group")?;
        debug!("created group '{}' ({}) on board '{}'", title, created.create_group.id, self.title);
        let group = Group::new(
            self.remote.clone(),
            self.board_id.clone(),
            self.columns.clone(),
            title.to_string(),
            created.create_group.id,
        );
        self.groups.write().await.insert(title.to_string(), group.clone());
        Ok(group)
    }

    /// Create a column remotely; its id is known before this returns.
    /// Title-keyed, last write wins.
    pub async fn create_column(
        &self,
        title: &str,
        description: &str,
        kind: ColumnKind,
    ) -> Result<Column> {
        let data = self
            .remote
            .execute(&query::create_column(&self.board_id, title, description, &kind))
            .await?;
        let created: CreateColumnEnvelope = payload::decode(data, "create_column")?;
        let column = Column::new(
            self.board_id.clone(),
            title.to_string(),
            description.to_string(),
            kind,
            created.create_column.id,
        );
        self.columns
            .write()
            .await
            .insert(title.to_string(), column.clone());
        Ok(column)
    }
}
