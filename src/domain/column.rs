//! Column entity.

use getset::Getters;

use crate::infrastructure::web::payload::ColumnPayload;

/// Column kinds supported by the remote service. Hydration can encounter
/// kinds this crate has no special handling for; those round-trip through
/// `Other` untouched.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ColumnKind {
    Status,
    Date,
    Text,
    Link,
    File,
    Rating,
    Numbers,
    People,
    Other(String),
}

impl ColumnKind {
    /// The unquoted enum token used in column-creation mutations.
    pub fn as_token(&self) -> &str {
        match self {
            ColumnKind::Status => "status",
            ColumnKind::Date => "date",
            ColumnKind::Text => "text",
            ColumnKind::Link => "link",
            ColumnKind::File => "file",
            ColumnKind::Rating => "rating",
            ColumnKind::Numbers => "numbers",
            ColumnKind::People => "people",
            ColumnKind::Other(token) => token,
        }
    }

    pub fn from_token(token: &str) -> Self {
        match token {
            "status" => ColumnKind::Status,
            "date" => ColumnKind::Date,
            "text" => ColumnKind::Text,
            "link" => ColumnKind::Link,
            "file" => ColumnKind::File,
            "rating" => ColumnKind::Rating,
            "numbers" => ColumnKind::Numbers,
            "people" => ColumnKind::People,
            other => ColumnKind::Other(other.to_string()),
        }
    }
}

/// A typed field definition applied to all items of a board. Remote ids are
/// opaque strings; locally they are only interpolated into queries.
#[derive(Debug, Clone, Getters)]
#[getset(get = "pub")]
pub struct Column {
    title: String,
    description: String,
    kind: ColumnKind,
    column_id: String,
    /// Back-reference to the owning board, by remote id.
    board_id: String,
}

impl Column {
    pub(crate) fn new(
        board_id: String,
        title: String,
        description: String,
        kind: ColumnKind,
        column_id: String,
    ) -> Self {
        Self {
            title,
            description,
            kind,
            column_id,
            board_id,
        }
    }

    pub(crate) fn hydrate(board_id: String, payload: ColumnPayload) -> Self {
        Self {
            title: payload.title,
            description: payload.description.unwrap_or_default(),
            kind: ColumnKind::from_token(&payload.kind),
            column_id: payload.id,
            board_id,
        }
    }
}
