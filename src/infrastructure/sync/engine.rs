//! Sync Engine
//!
//! Populates the entity model from bulk remote fetches at workspace
//! construction and drives the board create/attach paths. Hydration issues
//! one detail fetch per board rather than a single combined call; the remote
//! service penalizes very large responses.

use std::collections::HashMap;

use log::{debug, warn};

use crate::common::errors::{Result, SyncError};
use crate::domain::board::Board;
use crate::domain::remote::SharedRemote;
use crate::domain::workspace::Workspace;
use crate::infrastructure::web::payload::{
    self, BoardDetailEnvelope, BoardsEnvelope, CreateBoardEnvelope,
};
use crate::infrastructure::web::query;

pub struct HydratedWorkspace {
    pub workspace_id: String,
    pub boards: HashMap<String, Board>,
}

/// Fetch up to `boards_limit` boards, keep the ones whose workspace name
/// matches, and hydrate each from its own detail fetch. The workspace id is
/// resolved through the first hydrated board; with zero matching boards the
/// workspace cannot be resolved at all.
pub async fn hydrate_workspace(
    name: &str,
    boards_limit: u32,
    remote: &SharedRemote,
) -> Result<HydratedWorkspace> {
    let data = remote.execute(&query::list_boards(boards_limit)).await?;
    let listing: BoardsEnvelope = payload::decode(data, "board listing")?;

    let mut boards = HashMap::new();
    let mut first_board_id: Option<String> = None;
    for summary in listing.boards {
        let in_workspace = summary
            .workspace
            .as_ref()
            .map(|ws| ws.name == name)
            .unwrap_or(false);
        if !in_workspace {
            continue;
        }

        let data = remote.execute(&query::board_detail(&summary.id)).await?;
        let envelope: BoardDetailEnvelope = payload::decode(data, "board detail")?;
        let detail = envelope
            .boards
            .into_iter()
            .next()
            .ok_or_else(|| SyncError::MalformedResponse {
                detail: format!("board detail for '{}' came back empty", summary.name),
            })?;

        debug!("hydrating board '{}' ({})", summary.name, summary.id);
        let board = Board::hydrate(remote.clone(), summary.name.clone(), detail).await?;
        first_board_id.get_or_insert_with(|| board.board_id().clone());
        boards.insert(summary.name, board);
    }

    let Some(board_id) = first_board_id else {
        return Err(SyncError::EmptyWorkspace {
            workspace: name.to_string(),
        });
    };
    let workspace_id = resolve_workspace_id(remote, &board_id).await?;

    Ok(HydratedWorkspace {
        workspace_id,
        boards,
    })
}

/// The remote service only exposes a workspace id through its boards.
async fn resolve_workspace_id(remote: &SharedRemote, board_id: &str) -> Result<String> {
    let data = remote.execute(&query::board_identity(board_id)).await?;
    let listing: BoardsEnvelope = payload::decode(data, "board identity")?;
    listing
        .boards
        .first()
        .and_then(|board| board.workspace.as_ref())
        .map(|ws| ws.id.clone())
        .ok_or_else(|| SyncError::MalformedResponse {
            detail: format!("board {} carries no workspace identity", board_id),
        })
}

/// Creation path: request remote creation, normalize away any default group
/// the service auto-generated, register the board in its workspace.
pub async fn create_board(workspace: &Workspace, title: &str) -> Result<Board> {
    let remote = workspace.remote();
    let data = remote
        .execute(&query::create_board(title, workspace.workspace_id()))
        .await?;
    let created: CreateBoardEnvelope = payload::decode(data, "create_board")?;

    let board = Board::new(remote.clone(), title.to_string(), created.create_board.id);
    delete_default_groups(remote, board.board_id()).await?;
    workspace.add_board(board.clone()).await;
    Ok(board)
}

/// `exists=true` path: search the board listing by title instead of creating,
/// then perform the same default-group cleanup.
pub async fn attach_board(workspace: &Workspace, title: &str) -> Result<Board> {
    let remote = workspace.remote();
    let data = remote
        .execute(&query::list_boards(*workspace.boards_limit()))
        .await?;
    let listing: BoardsEnvelope = payload::decode(data, "board listing")?;

    for summary in listing.boards {
        let in_workspace = summary
            .workspace
            .as_ref()
            .map(|ws| ws.name == *workspace.name())
            .unwrap_or(false);
        if !in_workspace || summary.name != title {
            continue;
        }

        let board = Board::new(remote.clone(), title.to_string(), summary.id);
        delete_default_groups(remote, board.board_id()).await?;
        workspace.add_board(board.clone()).await;
        return Ok(board);
    }

    warn!(
        "board '{}' not found in workspace '{}'",
        title,
        workspace.name()
    );
    Err(SyncError::BoardNotFound {
        workspace: workspace.name().clone(),
        title: title.to_string(),
    })
}

async fn delete_default_groups(remote: &SharedRemote, board_id: &str) -> Result<()> {
    let data = remote.execute(&query::board_groups(board_id)).await?;
    let listing: BoardDetailEnvelope = payload::decode(data, "board groups")?;
    if let Some(detail) = listing.boards.into_iter().next() {
        for group in detail.groups {
            debug!("deleting default group '{}' on board {}", group.title, board_id);
            remote
                .execute(&query::delete_group(board_id, &group.id))
                .await?;
        }
    }
    Ok(())
}
