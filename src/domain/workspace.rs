//! Workspace aggregate and its configuration.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use derivative::Derivative;
use getset::{Getters, Setters};
use log::info;
use tokio::sync::RwLock;
use url::Url;

use crate::common::errors::Result;
use crate::domain::board::Board;
use crate::domain::remote::SharedRemote;
use crate::infrastructure::sync::engine;
use crate::infrastructure::web::executor::{FileErrorSink, RequestExecutor, TokioSleeper};
use crate::infrastructure::web::transport::HttpTransport;

pub const DEFAULT_API_URL: &str = "https://api.monday.com/v2";

pub type SharedBoards = Arc<RwLock<HashMap<String, Board>>>;

fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).expect("default api url is well-formed")
}

/// The file-upload endpoint lives one path segment below the query endpoint.
pub(crate) fn file_endpoint(api_url: &Url) -> Url {
    let joined = format!("{}/file", api_url.as_str().trim_end_matches('/'));
    Url::parse(&joined).expect("file endpoint derived from a valid url")
}

/// Configuration surface consumed by the crate.
///
/// `boards_limit` caps the board-listing page size; very large listings are
/// penalized by the remote service's complexity budget. `echo_protocol`
/// raises every sent query and received payload to info-level logs.
#[derive(Derivative, Debug, Clone, Getters, Setters)]
#[derivative(Default)]
#[getset(get = "pub", set = "pub")]
pub struct WorkspaceConfig {
    name: String,
    token: String,
    #[derivative(Default(value = "default_api_url()"))]
    api_url: Url,
    #[derivative(Default(value = "500"))]
    boards_limit: u32,
    echo_protocol: bool,
    #[derivative(Default(value = "Duration::from_secs(1)"))]
    poll_interval: Duration,
    #[derivative(Default(value = "PathBuf::from(\"errors.txt\")"))]
    error_log: PathBuf,
}

impl WorkspaceConfig {
    pub fn new(name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: token.into(),
            ..Default::default()
        }
    }
}

/// Top-level remote grouping of boards, identified by name.
///
/// Construction hydrates the full entity model from the remote service and
/// resolves the workspace's remote id through one of its boards; a workspace
/// with no boards is a terminal configuration error, not a retry condition.
#[derive(Clone, Getters)]
#[getset(get = "pub")]
pub struct Workspace {
    name: String,
    workspace_id: String,
    boards_limit: u32,
    boards: SharedBoards,
    #[getset(skip)]
    remote: SharedRemote,
}

impl Workspace {
    /// Production constructor: builds the http transport, the file-backed
    /// error sink and the request executor, then hydrates.
    pub async fn connect(config: WorkspaceConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(config.token().clone()));
        let executor = RequestExecutor::new(
            transport,
            config.api_url().clone(),
            file_endpoint(config.api_url()),
            *config.echo_protocol(),
            Arc::new(FileErrorSink::new(config.error_log().clone())),
            Arc::new(TokioSleeper),
        );
        Self::with_remote(
            config.name().clone(),
            *config.boards_limit(),
            Arc::new(executor),
        )
        .await
    }

    /// Constructor over an explicit remote, the seam tests hydrate through.
    pub async fn with_remote(
        name: String,
        boards_limit: u32,
        remote: SharedRemote,
    ) -> Result<Self> {
        let hydrated = engine::hydrate_workspace(&name, boards_limit, &remote).await?;
        info!(
            "workspace '{}' ({}) hydrated with {} board(s)",
            name,
            hydrated.workspace_id,
            hydrated.boards.len()
        );
        Ok(Self {
            name,
            workspace_id: hydrated.workspace_id,
            boards_limit,
            boards: Arc::new(RwLock::new(hydrated.boards)),
            remote,
        })
    }

    pub(crate) fn remote(&self) -> &SharedRemote {
        &self.remote
    }

    /// Re-fetch remote state and replace the local board mirror.
    pub async fn refresh(&self) -> Result<()> {
        let hydrated = engine::hydrate_workspace(&self.name, self.boards_limit, &self.remote).await?;
        *self.boards.write().await = hydrated.boards;
        Ok(())
    }

    pub async fn board(&self, title: &str) -> Option<Board> {
        self.boards.read().await.get(title).cloned()
    }

    /// Register a board under its title. Last write wins.
    pub(crate) async fn add_board(&self, board: Board) {
        self.boards.write().await.insert(board.title().clone(), board);
    }

    /// Create a board remotely and register it locally. Any default group the
    /// service auto-generated is deleted as a normalization step.
    pub async fn create_board(&self, title: &str) -> Result<Board> {
        engine::create_board(self, title).await
    }

    /// Recover an existing remote board by title without re-creating it,
    /// applying the same default-group cleanup as the creation path.
    pub async fn attach_board(&self, title: &str) -> Result<Board> {
        engine::attach_board(self, title).await
    }
}
