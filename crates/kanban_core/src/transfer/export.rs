//! Board export.

use crate::model::board::BoardState;

/// Suggested file name for downloaded exports.
pub const EXPORT_FILE_NAME: &str = "kanban-board-export.json";

/// Serializes the whole board (tasks, columns, audit log) as pretty JSON.
///
/// # Errors
/// - Propagates `serde_json` serialization failures.
pub fn export_board(state: &BoardState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(state)
}
