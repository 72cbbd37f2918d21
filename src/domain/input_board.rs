//! Runnable board variants.
//!
//! The input-driven and generic-thread-bound boards are plain boards plus an
//! optional schedulable-task handle; whether a board "is also runnable" is a
//! capability check on that handle, not a type hierarchy.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use getset::Getters;
use log::{error, warn};

use crate::common::errors::Result;
use crate::domain::board::Board;
use crate::domain::column::ColumnKind;
use crate::domain::workspace::Workspace;
use crate::infrastructure::sync::dispatcher::{
    HandlerRegistry, PollingDispatcher, STATUS_DONE,
};
use crate::infrastructure::sync::runner::{spawn_unit, TaskHandle};
use crate::infrastructure::web::query;

pub const STATUS_COLUMN_TITLE: &str = "Execution Status";

/// A board that accepts input from remote users. Creating one also creates
/// the status column the dispatcher and handler units write their markers to.
#[derive(Getters)]
#[getset(get = "pub")]
pub struct InputBoard {
    board: Board,
    status_column_id: String,
    poll_interval: Duration,
    #[getset(skip)]
    handlers: Arc<HandlerRegistry>,
    #[getset(skip)]
    task: Option<TaskHandle>,
}

impl InputBoard {
    pub async fn create(
        workspace: &Workspace,
        title: &str,
        handlers: HandlerRegistry,
        poll_interval: Duration,
    ) -> Result<Self> {
        let board = workspace.create_board(title).await?;
        let status = board
            .create_column(STATUS_COLUMN_TITLE, "", ColumnKind::Status)
            .await?;
        Ok(Self {
            board,
            status_column_id: status.column_id().clone(),
            poll_interval,
            handlers: Arc::new(handlers),
            task: None,
        })
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Spawn the polling dispatcher as an independent unit. Idempotent: a
    /// second call is ignored, because the dispatcher has no stop mechanism.
    pub fn start(&mut self) {
        if self.is_running() {
            warn!("input board '{}' is already running", self.board.title());
            return;
        }
        let dispatcher = PollingDispatcher::new(
            self.board.remote().clone(),
            self.board.board_id().clone(),
            self.status_column_id.clone(),
            self.handlers.clone(),
            self.poll_interval,
        );
        let name = format!("dispatcher:{}", self.board.title());
        self.task = Some(spawn_unit(&name, async move {
            if let Err(e) = dispatcher.run().await {
                error!("input board dispatcher stopped: {}", e);
            }
        }));
    }

    /// Report an item as handled, using the same (board, item, column,
    /// marker) contract as the handler-completion path.
    pub async fn mark_done(&self, item_id: &str) -> Result<()> {
        self.board
            .remote()
            .execute(&query::change_column_value(
                self.board.board_id(),
                item_id,
                &self.status_column_id,
                &query::status_index(STATUS_DONE),
            ))
            .await?;
        Ok(())
    }
}

/// A board bound to an arbitrary long-running task supplied by the
/// integrator. The task receives its own clone of the board.
#[derive(Getters)]
#[getset(get = "pub")]
pub struct TaskBoard {
    board: Board,
    #[getset(skip)]
    task: Option<TaskHandle>,
}

impl TaskBoard {
    pub async fn create(workspace: &Workspace, title: &str) -> Result<Self> {
        Ok(Self {
            board: workspace.create_board(title).await?,
            task: None,
        })
    }

    /// Bind to an existing remote board instead of creating one.
    pub async fn attach(workspace: &Workspace, title: &str) -> Result<Self> {
        Ok(Self {
            board: workspace.attach_board(title).await?,
            task: None,
        })
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    pub fn start<F, Fut>(&mut self, f: F)
    where
        F: FnOnce(Board) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.is_running() {
            warn!("board '{}' is already running a task", self.board.title());
            return;
        }
        let name = format!("board:{}", self.board.title());
        self.task = Some(spawn_unit(&name, f(self.board.clone())));
    }
}
