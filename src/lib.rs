//! board-sync
//!
//! A client-side synchronization layer between a local object model
//! (workspace, board, group, column, item) and a remote collaborative-board
//! service reachable through a query-based HTTP API. Remote state is mirrored
//! into local entities, local mutations propagate back as remote mutations,
//! and an input-driven automation pattern dispatches new remote items to
//! concurrently running handler tasks.
//!
//! Every remote call flows through the [`RequestExecutor`], which absorbs the
//! service's rate limiting by backing off and resubmitting. Mutations may
//! therefore execute more than once remotely; callers needing exactly-once
//! semantics must dedupe by remote id.

pub mod common;
pub mod domain;
pub mod infrastructure;

pub use common::errors::{Result, SyncError};
pub use domain::board::Board;
pub use domain::column::{Column, ColumnKind};
pub use domain::group::Group;
pub use domain::input_board::{InputBoard, TaskBoard, STATUS_COLUMN_TITLE};
pub use domain::item::{ColumnValue, Item};
pub use domain::remote::{Remote, SharedRemote};
pub use domain::workspace::{Workspace, WorkspaceConfig, DEFAULT_API_URL};
pub use infrastructure::sync::dispatcher::{
    DispatcherState, HandlerRegistry, ItemHandler, PollingDispatcher, STATUS_DONE, STATUS_WORKING,
};
pub use infrastructure::sync::runner::{spawn_unit, TaskHandle};
pub use infrastructure::web::executor::{
    ErrorSink, FileErrorSink, RequestExecutor, Sleeper, TokioSleeper,
};
pub use infrastructure::web::transport::{HttpTransport, Transport, TransportError};
