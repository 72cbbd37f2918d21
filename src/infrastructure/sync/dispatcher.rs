//! Polling Dispatcher
//!
//! A long-running unit that periodically re-fetches a board's items, detects
//! unprocessed ones (empty or absent first column value), marks them
//! in-progress remotely, and spawns one independent handler unit per detected
//! item. Marking happens before spawning, so a slow poll interval cannot
//! re-detect and re-dispatch the same item under normal timing; that is the
//! only ordering invariant across units.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use getset::Getters;
use log::{debug, info};

use crate::common::errors::{Result, SyncError};
use crate::domain::remote::SharedRemote;
use crate::infrastructure::sync::runner::HandlerTask;
use crate::infrastructure::web::executor::{Sleeper, TokioSleeper};
use crate::infrastructure::web::payload::{self, PollEnvelope};
use crate::infrastructure::web::query;

/// Status markers written to the board's status column.
pub const STATUS_WORKING: u8 = 0;
pub const STATUS_DONE: u8 = 1;

/// Integrator-supplied callback invoked with the name of each newly detected
/// item in its registered group.
#[async_trait]
pub trait ItemHandler: Send + Sync {
    async fn handle(&self, item_name: String);
}

/// Group title to handler. Every group accepting input must be registered;
/// an unmatched group fails the dispatcher loudly.
pub type HandlerRegistry = HashMap<String, Arc<dyn ItemHandler>>;

#[derive(Debug, PartialEq, Eq)]
pub enum DispatcherState {
    Idle,
    Polling,
    Dispatching,
}

#[derive(Getters)]
#[getset(get = "pub")]
pub struct PollingDispatcher {
    board_id: String,
    status_column_id: String,
    poll_interval: Duration,
    state: DispatcherState,
    #[getset(skip)]
    remote: SharedRemote,
    #[getset(skip)]
    handlers: Arc<HandlerRegistry>,
    #[getset(skip)]
    sleeper: Arc<dyn Sleeper>,
}

impl PollingDispatcher {
    pub fn new(
        remote: SharedRemote,
        board_id: String,
        status_column_id: String,
        handlers: Arc<HandlerRegistry>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            board_id,
            status_column_id,
            poll_interval,
            state: DispatcherState::Idle,
            remote,
            handlers,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Swap the inter-poll sleep, so tests can run cycles without real delays.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Run until process termination. Only an unregistered group or a
    /// terminal remote failure ends the loop, and both do so with an error.
    pub async fn run(mut self) -> Result<()> {
        info!(
            "dispatcher started for board {} (interval {:?})",
            self.board_id, self.poll_interval
        );
        loop {
            let spawned = self.poll_once().await?;
            if spawned > 0 {
                debug!("dispatched {} handler unit(s) for board {}", spawned, self.board_id);
            }
            self.sleeper.sleep(self.poll_interval).await;
        }
    }

    /// One full poll cycle: fetch items, mark and spawn every unprocessed
    /// one. Returns the number of handler units spawned.
    pub async fn poll_once(&mut self) -> Result<usize> {
        self.state = DispatcherState::Polling;
        let data = self.remote.execute(&query::poll_items(&self.board_id)).await?;
        let envelope: PollEnvelope = payload::decode(data, "item poll")?;
        let items = envelope
            .boards
            .into_iter()
            .next()
            .map(|board| board.items)
            .unwrap_or_default();

        self.state = DispatcherState::Dispatching;
        let mut spawned = 0;
        for item in items {
            if !item.is_unprocessed() {
                continue;
            }

            // Resolve the handler before touching the item, so a
            // misconfigured group fails without stranding it in-progress.
            let handler = self
                .handlers
                .get(&item.group.title)
                .cloned()
                .ok_or_else(|| SyncError::UnregisteredGroup {
                    group: item.group.title.clone(),
                })?;

            self.remote
                .execute(&query::change_column_value(
                    &self.board_id,
                    &item.id,
                    &self.status_column_id,
                    &query::status_index(STATUS_WORKING),
                ))
                .await?;

            HandlerTask::new(
                self.remote.clone(),
                self.board_id.clone(),
                item.id,
                self.status_column_id.clone(),
                handler,
                item.name,
            )
            .spawn();
            spawned += 1;
        }

        self.state = DispatcherState::Idle;
        Ok(spawned)
    }
}
