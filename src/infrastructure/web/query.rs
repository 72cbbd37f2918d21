//! Query Protocol
//!
//! One builder per remote operation. Every builder is a pure function of its
//! arguments and produces byte-identical output for identical inputs, which
//! keeps re-submission after a retry safe and the protocol testable.
//!
//! All free-text interpolation (titles, names, bodies) flows through
//! [`quote`], and every JSON-in-a-string argument flows through [`embed`].
//! No caller assembles escaped text by hand.

use serde_json::{json, Value};

use crate::domain::column::ColumnKind;

/// Escape a free-text value and wrap it in double quotes for use as a string
/// argument.
pub fn quote(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// Serialize a JSON value and escape it for embedding inside a quoted string
/// argument (the `column_values` and `value` arguments carry JSON-in-a-string).
pub fn embed(value: &Value) -> String {
    quote(&value.to_string())
}

/// The status payload used by the polling dispatcher and handler units.
pub fn status_index(index: u8) -> Value {
    json!({ "index": index })
}

pub fn list_boards(limit: u32) -> String {
    format!("{{ boards (limit:{}) {{id name workspace {{id name}} }}}}", limit)
}

pub fn board_detail(board_id: &str) -> String {
    format!(
        "{{ boards (ids:{}) {{id name groups{{id title}} columns{{id title type description}} \
         items{{id name group{{ id title }} column_values{{id text}}}} }}}}",
        board_id
    )
}

pub fn board_identity(board_id: &str) -> String {
    format!("{{ boards (ids:{}) {{id name workspace {{id name}} }}}}", board_id)
}

pub fn board_groups(board_id: &str) -> String {
    format!("{{ boards (ids: {}) {{id groups{{id title}}}} }}", board_id)
}

pub fn poll_items(board_id: &str) -> String {
    format!(
        "{{ boards (ids: {}) {{id items{{id name group {{id title}} column_values {{title value}}}}}} }}",
        board_id
    )
}

pub fn create_board(name: &str, workspace_id: &str) -> String {
    format!(
        "mutation {{ create_board (board_name: {}, board_kind: private, workspace_id: {}) {{ id }} }}",
        quote(name),
        workspace_id
    )
}

pub fn delete_group(board_id: &str, group_id: &str) -> String {
    format!(
        "mutation {{ delete_group (board_id: {}, group_id: {}) {{ id deleted }} }}",
        board_id,
        quote(group_id)
    )
}

pub fn create_group(board_id: &str, title: &str) -> String {
    format!(
        "mutation {{ create_group (board_id: {}, group_name: {}) {{ id }} }}",
        board_id,
        quote(title)
    )
}

pub fn create_column(board_id: &str, title: &str, description: &str, kind: &ColumnKind) -> String {
    format!(
        "mutation {{ create_column (board_id: {}, title: {}, description: {}, column_type: {}) \
         {{ id title description }} }}",
        board_id,
        quote(title),
        quote(description),
        kind.as_token()
    )
}

/// `column_values` maps remote column ids to either a scalar text value or a
/// structured payload, already assembled by the caller.
pub fn create_item(board_id: &str, group_id: &str, name: &str, column_values: &Value) -> String {
    format!(
        "mutation {{ create_item (board_id: {}, group_id: {}, item_name: {}, column_values: {}) {{ id }} }}",
        board_id,
        quote(group_id),
        quote(name),
        embed(column_values)
    )
}

pub fn change_column_value(board_id: &str, item_id: &str, column_id: &str, value: &Value) -> String {
    format!(
        "mutation {{ change_column_value (board_id: {}, item_id: {}, column_id: {}, value: {}) {{ id }} }}",
        board_id,
        item_id,
        quote(column_id),
        embed(value)
    )
}

pub fn create_update(item_id: &str, body: &str) -> String {
    format!(
        "mutation {{ create_update (item_id: {}, body: {}) {{ id }} }}",
        item_id,
        quote(body)
    )
}

/// The file itself travels as a multipart part next to this mutation.
pub fn add_file_to_column(item_id: &str, column_id: &str) -> String {
    format!(
        "mutation ($file: File!) {{ add_file_to_column (file: $file, item_id: {}, column_id: {}) {{ id }} }}",
        item_id,
        quote(column_id)
    )
}
