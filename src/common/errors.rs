//! Custom Errors and Types
//!
//! Rate-limit errors never appear here: they are absorbed inside the request
//! executor by waiting and resubmitting. Everything that does surface is
//! either a terminal configuration problem or a response the crate could not
//! make sense of.

use std::error;
use std::fmt::{self, Display, Formatter};

use crate::infrastructure::web::transport::TransportError;

pub type Result<T> = std::result::Result<T, SyncError>;

#[derive(Debug)]
pub enum SyncError {
    /// The transport failed below the response level (connection, body read,
    /// unreadable upload file). Not retried; the transport is assumed
    /// reliable at the byte level.
    Transport(TransportError),
    /// The response carried neither an error indicator nor a data payload.
    /// Reported, never retried.
    MissingData { query: String },
    /// The response parsed, but its shape did not match the operation.
    MalformedResponse { detail: String },
    /// The remote service does not expose workspaces without boards, so a
    /// workspace with zero matching boards cannot resolve its own id.
    EmptyWorkspace { workspace: String },
    /// The `attach` construction path found no remote board with the
    /// requested title in the target workspace.
    BoardNotFound { workspace: String, title: String },
    /// An operation referenced a column title absent from the board.
    UnknownColumn { title: String },
    /// A new input item arrived in a group with no registered handler.
    UnregisteredGroup { group: String },
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SyncError::Transport(e) => write!(f, "transport failure: {}", e),
            SyncError::MissingData { query } => {
                write!(f, "response carried neither errors nor data (query: {})", query)
            }
            SyncError::MalformedResponse { detail } => {
                write!(f, "malformed response: {}", detail)
            }
            SyncError::EmptyWorkspace { workspace } => write!(
                f,
                "workspace '{}' has no boards; the remote service cannot resolve an empty workspace",
                workspace
            ),
            SyncError::BoardNotFound { workspace, title } => {
                write!(f, "no board titled '{}' in workspace '{}'", title, workspace)
            }
            SyncError::UnknownColumn { title } => {
                write!(f, "no column titled '{}' on this board", title)
            }
            SyncError::UnregisteredGroup { group } => {
                write!(f, "no handler registered for group '{}'", group)
            }
        }
    }
}

impl error::Error for SyncError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            SyncError::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TransportError> for SyncError {
    fn from(err: TransportError) -> SyncError {
        SyncError::Transport(err)
    }
}
