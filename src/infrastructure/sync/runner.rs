//! Task Runner
//!
//! Every independently scheduled unit of work in this crate (the dispatcher
//! loop, each per-item handler) goes through [`spawn_unit`], which tags the
//! task with an id and logs its lifecycle. There is no cancellation: a unit
//! runs until it finishes or the process exits.

use std::future::Future;
use std::sync::Arc;

use getset::Getters;
use log::{debug, error};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::domain::remote::SharedRemote;
use crate::infrastructure::sync::dispatcher::{ItemHandler, STATUS_DONE};
use crate::infrastructure::web::query;

/// Handle to a spawned unit. Dropping it detaches the unit; it keeps running.
#[derive(Debug, Getters)]
#[getset(get = "pub")]
pub struct TaskHandle {
    id: Uuid,
    name: String,
    #[getset(skip)]
    handle: JoinHandle<()>,
}

impl TaskHandle {
    /// Wait for the unit to finish. Only meaningful for units that terminate.
    pub async fn join(self) {
        let _ = self.handle.await;
    }
}

pub fn spawn_unit<F>(name: &str, future: F) -> TaskHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    let id = Uuid::new_v4();
    let unit_name = name.to_string();
    let handle = tokio::spawn({
        let unit_name = unit_name.clone();
        async move {
            debug!("unit {} ({}) started", id, unit_name);
            future.await;
            debug!("unit {} ({}) finished", id, unit_name);
        }
    });
    TaskHandle {
        id,
        name: unit_name,
        handle,
    }
}

/// One spawned handler execution: run the user handler with the item's name,
/// then report completion with the done marker.
///
/// Handler panics are not contained. A panicking handler aborts only this
/// unit and skips the completion report, leaving its item marked in-progress
/// until someone intervenes.
pub(crate) struct HandlerTask {
    remote: SharedRemote,
    board_id: String,
    item_id: String,
    status_column_id: String,
    handler: Arc<dyn ItemHandler>,
    item_name: String,
}

impl HandlerTask {
    pub(crate) fn new(
        remote: SharedRemote,
        board_id: String,
        item_id: String,
        status_column_id: String,
        handler: Arc<dyn ItemHandler>,
        item_name: String,
    ) -> Self {
        Self {
            remote,
            board_id,
            item_id,
            status_column_id,
            handler,
            item_name,
        }
    }

    pub(crate) fn spawn(self) -> TaskHandle {
        let name = format!("handler:{}", self.item_name);
        spawn_unit(&name, self.run())
    }

    async fn run(self) {
        self.handler.handle(self.item_name.clone()).await;

        // Completion report carries the full (board, item, column, marker)
        // contract, the same one the dispatcher uses for the working marker.
        let done = query::change_column_value(
            &self.board_id,
            &self.item_id,
            &self.status_column_id,
            &query::status_index(STATUS_DONE),
        );
        if let Err(e) = self.remote.execute(&done).await {
            error!(
                "failed to report completion for item {}: {}",
                self.item_id, e
            );
        }
    }
}
