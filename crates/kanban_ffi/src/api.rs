//! FFI use-case API for the Flutter board UI.
//!
//! # Responsibility
//! - Expose board mutations, search, import/export and review through FRB.
//! - Translate core types into flat response envelopes.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Each call opens the board database, runs one operation and drops the
//!   connection.
//! - A mutation reports `ok = true` only after its snapshot is written; a
//!   failed write is reported as `ok = false`.
//! - Missing ids are reported as `ok = false` without touching the board.

use kanban_core::config::{DEFAULT_ERROR_DISPLAY_LIMIT, ENV_DB_PATH};
use kanban_core::transfer::EXPORT_FILE_NAME;
use kanban_core::{
    capped_messages, core_version as core_version_inner, init_logging as init_logging_inner,
    ping as ping_inner, BoardConfig, BoardStore, ColumnId, MoveRequest, Priority,
    PersistenceAdapter, ReorderRequest, SqlitePersistence, SupervisorNote, SupervisorSummary,
    Task, TaskInput,
};
use log::{error, warn};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const BOARD_DB_FILE_NAME: &str = "kanban_board.sqlite3";
static BOARD_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Health check for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking. Never throws.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// - `level`: `trace|debug|info|warn|error`, case-insensitive.
/// - `log_dir`: absolute directory for rolling log files.
///
/// # FFI contract
/// - Idempotent for the same `level + log_dir`; other configurations fail.
/// - Returns an empty string on success, the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Task form payload as submitted by the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    /// `low|medium|high`.
    pub priority: String,
    pub tags: Vec<String>,
    pub estimation_min: u32,
    /// `YYYY-MM-DD` or RFC 3339.
    pub due_at: Option<String>,
    /// `todo|doing|done`.
    pub status: String,
    /// Present only when the supervisor panel was edited.
    pub supervisor: Option<SupervisorDraft>,
}

/// Supervisor panel payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SupervisorDraft {
    pub notes: String,
    pub score: Option<f64>,
    pub comment: String,
}

/// Result of a board mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardActionResponse {
    pub ok: bool,
    /// Created task id, for create only.
    pub task_id: Option<String>,
    pub message: String,
}

impl BoardActionResponse {
    fn success(message: impl Into<String>, task_id: Option<String>) -> Self {
        Self {
            ok: true,
            task_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            message: message.into(),
        }
    }

    fn applied(applied: bool, message: &str) -> Self {
        if applied {
            Self::success(message, None)
        } else {
            Self::failure("Task not found; nothing changed.")
        }
    }
}

/// Serialized board document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardDocumentResponse {
    pub ok: bool,
    /// Pretty JSON export document; empty on failure.
    pub document: String,
    /// Suggested download name.
    pub file_name: String,
    pub message: String,
}

/// Import result with itemized, display-capped errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardImportResponse {
    pub ok: bool,
    pub regenerated: u32,
    /// First errors followed by `…` when more exist.
    pub errors: Vec<String>,
    pub message: String,
}

/// One column of a filtered board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchColumnItem {
    pub column: String,
    pub task_ids: Vec<String>,
    pub total_estimation_min: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSearchResponse {
    pub columns: Vec<SearchColumnItem>,
    /// Operator tokens that were not understood.
    pub unknown_tokens: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupervisorSummaryResponse {
    pub reviewed: u32,
    pub unreviewed: u32,
    pub average_score: Option<f64>,
    pub unreviewed_titles: Vec<String>,
}

/// Full board as an export document, for UI hydration.
#[flutter_rust_bridge::frb(sync)]
pub fn board_export() -> BoardDocumentResponse {
    export_at(&resolve_board_db_path())
}

/// Creates a task after form validation.
#[flutter_rust_bridge::frb(sync)]
pub fn board_create_task(draft: TaskDraft) -> BoardActionResponse {
    create_task_at(&resolve_board_db_path(), draft)
}

/// Replaces the editable fields of a task.
#[flutter_rust_bridge::frb(sync)]
pub fn board_update_task(task_id: String, draft: TaskDraft) -> BoardActionResponse {
    update_task_at(&resolve_board_db_path(), &task_id, draft)
}

#[flutter_rust_bridge::frb(sync)]
pub fn board_delete_task(task_id: String) -> BoardActionResponse {
    delete_task_at(&resolve_board_db_path(), &task_id)
}

/// Drag-originated move between columns.
#[flutter_rust_bridge::frb(sync)]
pub fn board_move_task(
    task_id: String,
    from_col: String,
    to_col: String,
    from_index: u32,
    to_index: u32,
) -> BoardActionResponse {
    move_task_at(
        &resolve_board_db_path(),
        task_id,
        &from_col,
        &to_col,
        from_index,
        to_index,
    )
}

/// Drag-originated reorder inside one column.
#[flutter_rust_bridge::frb(sync)]
pub fn board_reorder_task(
    col: String,
    from_index: u32,
    to_index: u32,
    task_id: String,
) -> BoardActionResponse {
    reorder_task_at(&resolve_board_db_path(), &col, from_index, to_index, task_id)
}

#[flutter_rust_bridge::frb(sync)]
pub fn board_clear_audit_log() -> BoardActionResponse {
    clear_audit_log_at(&resolve_board_db_path())
}

/// Validates a document and replaces the board on success.
#[flutter_rust_bridge::frb(sync)]
pub fn board_import(raw: String) -> BoardImportResponse {
    import_at(&resolve_board_db_path(), &raw)
}

/// Runs a search query against the board for today's date.
#[flutter_rust_bridge::frb(sync)]
pub fn board_search(query: String) -> BoardSearchResponse {
    search_at(&resolve_board_db_path(), &query)
}

#[flutter_rust_bridge::frb(sync)]
pub fn supervisor_summary() -> SupervisorSummaryResponse {
    supervisor_summary_at(&resolve_board_db_path())
}

/// Supervisor mode flag; `false` when unset or the database is unavailable.
#[flutter_rust_bridge::frb(sync)]
pub fn supervisor_mode_get() -> bool {
    SqlitePersistence::open(resolve_board_db_path())
        .map(|persistence| persistence.load_supervisor_mode())
        .unwrap_or(false)
}

/// Stores the supervisor mode flag. Returns an empty string on success.
#[flutter_rust_bridge::frb(sync)]
pub fn supervisor_mode_set(enabled: bool) -> String {
    match SqlitePersistence::open(resolve_board_db_path()) {
        Ok(persistence) => {
            persistence.save_supervisor_mode(enabled);
            String::new()
        }
        Err(err) => format!("supervisor_mode_set failed: {err}"),
    }
}

fn export_at(db_path: &Path) -> BoardDocumentResponse {
    let document = with_board(db_path, |store| store.export_document())
        .and_then(|result| result.map_err(|err| err.to_string()));
    match document {
        Ok(document) => BoardDocumentResponse {
            ok: true,
            document,
            file_name: EXPORT_FILE_NAME.to_string(),
            message: "Exported.".to_string(),
        },
        Err(err) => BoardDocumentResponse {
            ok: false,
            document: String::new(),
            file_name: EXPORT_FILE_NAME.to_string(),
            message: format!("board_export failed: {err}"),
        },
    }
}

fn create_task_at(db_path: &Path, draft: TaskDraft) -> BoardActionResponse {
    let input = match task_input_from_draft(draft) {
        Ok(input) => input,
        Err(message) => return BoardActionResponse::failure(message),
    };
    match with_board_mut(db_path, |store| store.create_task(&input)) {
        Ok(task_id) => BoardActionResponse::success("Task created.", Some(task_id)),
        Err(err) => BoardActionResponse::failure(format!("board_create_task failed: {err}")),
    }
}

fn update_task_at(db_path: &Path, task_id: &str, draft: TaskDraft) -> BoardActionResponse {
    let input = match task_input_from_draft(draft) {
        Ok(input) => input,
        Err(message) => return BoardActionResponse::failure(message),
    };
    let outcome = with_board_mut(db_path, |store| store.update_task(task_id, &input));
    applied_response(outcome, "Task updated.", "board_update_task")
}

fn delete_task_at(db_path: &Path, task_id: &str) -> BoardActionResponse {
    let outcome = with_board_mut(db_path, |store| store.delete_task(task_id));
    applied_response(outcome, "Task deleted.", "board_delete_task")
}

fn move_task_at(
    db_path: &Path,
    task_id: String,
    from_col: &str,
    to_col: &str,
    from_index: u32,
    to_index: u32,
) -> BoardActionResponse {
    let (Some(from_col), Some(to_col)) = (ColumnId::parse(from_col), ColumnId::parse(to_col))
    else {
        return BoardActionResponse::failure("Unknown column; expected todo|doing|done.");
    };
    let request = MoveRequest {
        task_id,
        from_col,
        to_col,
        from_index: from_index as usize,
        to_index: to_index as usize,
    };
    let outcome = with_board_mut(db_path, |store| store.move_task_dnd(&request));
    applied_response(outcome, "Task moved.", "board_move_task")
}

fn reorder_task_at(
    db_path: &Path,
    col: &str,
    from_index: u32,
    to_index: u32,
    task_id: String,
) -> BoardActionResponse {
    let Some(col) = ColumnId::parse(col) else {
        return BoardActionResponse::failure("Unknown column; expected todo|doing|done.");
    };
    let request = ReorderRequest {
        col,
        from_index: from_index as usize,
        to_index: to_index as usize,
        task_id,
    };
    let outcome = with_board_mut(db_path, |store| store.reorder_task_dnd(&request));
    applied_response(outcome, "Task reordered.", "board_reorder_task")
}

fn clear_audit_log_at(db_path: &Path) -> BoardActionResponse {
    match with_board_mut(db_path, BoardStore::clear_audit_log) {
        Ok(()) => BoardActionResponse::success("Audit log cleared.", None),
        Err(err) => BoardActionResponse::failure(format!("board_clear_audit_log failed: {err}")),
    }
}

fn import_at(db_path: &Path, raw: &str) -> BoardImportResponse {
    match with_board_mut(db_path, |store| store.import_document(raw)) {
        Ok(Ok(regenerated)) => BoardImportResponse {
            ok: true,
            regenerated: u32::try_from(regenerated).unwrap_or(u32::MAX),
            errors: Vec::new(),
            message: kanban_core::transfer::import_notice(regenerated),
        },
        Ok(Err(err)) => BoardImportResponse {
            ok: false,
            regenerated: 0,
            errors: capped_messages(&err.messages(), DEFAULT_ERROR_DISPLAY_LIMIT),
            message: err.to_string(),
        },
        Err(err) => BoardImportResponse {
            ok: false,
            regenerated: 0,
            errors: Vec::new(),
            message: format!("board_import failed: {err}"),
        },
    }
}

fn search_at(db_path: &Path, query: &str) -> BoardSearchResponse {
    let outcome = with_board(db_path, |store| {
        let columns = store
            .search(query)
            .into_iter()
            .map(|view| SearchColumnItem {
                column: view.column.as_str().to_string(),
                total_estimation_min: view.total_estimation(),
                task_ids: view.tasks.iter().map(|task| task.id.clone()).collect(),
            })
            .collect::<Vec<_>>();
        (columns, kanban_core::parse_query(query).unknown_tokens)
    });

    match outcome {
        Ok((columns, unknown_tokens)) => {
            let hits = columns.iter().map(|column| column.task_ids.len()).sum::<usize>();
            let message = if hits == 0 {
                "No results.".to_string()
            } else {
                format!("Found {hits} task(s).")
            };
            BoardSearchResponse {
                columns,
                unknown_tokens,
                message,
            }
        }
        Err(err) => BoardSearchResponse {
            columns: Vec::new(),
            unknown_tokens: Vec::new(),
            message: format!("board_search failed: {err}"),
        },
    }
}

fn supervisor_summary_at(db_path: &Path) -> SupervisorSummaryResponse {
    let summary = with_board(db_path, |store| SupervisorSummary::from_board(store.state()))
        .unwrap_or_else(|_| SupervisorSummary::from_tasks(std::iter::empty::<&Task>()));
    SupervisorSummaryResponse {
        reviewed: u32::try_from(summary.reviewed).unwrap_or(u32::MAX),
        unreviewed: u32::try_from(summary.unreviewed).unwrap_or(u32::MAX),
        average_score: summary.average_score,
        unreviewed_titles: summary.unreviewed_titles,
    }
}

fn applied_response(
    outcome: Result<bool, String>,
    message: &str,
    operation: &str,
) -> BoardActionResponse {
    match outcome {
        Ok(applied) => BoardActionResponse::applied(applied, message),
        Err(err) => BoardActionResponse::failure(format!("{operation} failed: {err}")),
    }
}

fn task_input_from_draft(draft: TaskDraft) -> Result<TaskInput, String> {
    let priority = Priority::parse(draft.priority.trim())
        .ok_or_else(|| format!("Unknown priority `{}`; expected low|medium|high.", draft.priority))?;
    let status = ColumnId::parse(draft.status.trim())
        .ok_or_else(|| format!("Unknown status `{}`; expected todo|doing|done.", draft.status))?;

    let mut input = TaskInput::new(draft.title, priority, draft.estimation_min)
        .with_status(status)
        .with_tags(draft.tags);
    input.description = draft.description;
    input.due_at = draft.due_at;
    input.supervisor = draft.supervisor.map(|note| SupervisorNote {
        notes: note.notes,
        score: note.score,
        comment: note.comment,
    });

    input.validate().map_err(|err| err.to_string())?;
    Ok(input)
}

fn resolve_board_db_path() -> PathBuf {
    BOARD_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(ENV_DB_PATH) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(BOARD_DB_FILE_NAME)
        })
        .clone()
}

fn open_board(db_path: &Path) -> Result<(SqlitePersistence, BoardStore), String> {
    let persistence = SqlitePersistence::open(db_path).map_err(|err| {
        warn!("event=board_db_open module=ffi status=error error={err}");
        format!("board DB open failed: {err}")
    })?;
    let store = BoardStore::new(persistence.load(), BoardConfig::default());
    Ok((persistence, store))
}

/// Read-only access; nothing is written back.
fn with_board<T>(db_path: &Path, f: impl FnOnce(&BoardStore) -> T) -> Result<T, String> {
    let (_, store) = open_board(db_path)?;
    Ok(f(&store))
}

/// Runs one mutation and writes the snapshot when the board changed.
fn with_board_mut<T>(db_path: &Path, f: impl FnOnce(&mut BoardStore) -> T) -> Result<T, String> {
    let (persistence, mut store) = open_board(db_path)?;
    let before = store.state().clone();
    let value = f(&mut store);
    if store.state() != &before {
        persistence.try_save(store.state()).map_err(|err| {
            error!("event=board_save module=ffi status=error error={err}");
            format!("board save failed: {err}")
        })?;
    }
    Ok(value)
}
