//! Core board state engine for the kanban app.
//! This crate is the single source of truth for board invariants.

pub mod audit;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod review;
pub mod service;
pub mod store;
pub mod transfer;

pub use audit::report::{diff_summary, AuditFilter, AuditSummary};
pub use config::BoardConfig;
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::audit::{AuditAction, AuditDiff, AuditEvent, AuditValues};
pub use model::board::{BoardState, Columns};
pub use model::task::{
    normalize_tag, ColumnId, Priority, SupervisorNote, Task, TaskId, TaskInput,
    TaskValidationError,
};
pub use query::parser::{parse_query, DueFilter, EstFilter, EstOp, ParsedQuery};
pub use query::predicate::TaskPredicate;
pub use query::view::{filter_board, ColumnView};
pub use repo::board_repo::{BoardRepository, RepoError, RepoResult, SqliteBoardRepository};
pub use review::SupervisorSummary;
pub use service::persistence::{PersistenceAdapter, SqlitePersistence};
pub use store::{BoardStore, MoveRequest, ReorderRequest, SaveHook};
pub use transfer::{
    capped_messages, export_board, import_board, import_board_as, ImportError, ImportOutcome,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
