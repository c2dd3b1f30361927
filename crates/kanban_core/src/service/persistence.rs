//! Persistence adapter for the board store.
//!
//! # Responsibility
//! - Load the board at startup and snapshot it after each mutation.
//! - Persist the supervisor-mode preference.
//!
//! # Invariants
//! - `load` never fails: missing or unreadable data yields an empty board.
//! - `save` is best effort: failures are logged and swallowed, so the
//!   in-memory state stays authoritative for the session.

use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::model::board::BoardState;
use crate::repo::board_repo::{BoardRepository, RepoResult, SqliteBoardRepository};
use log::{debug, error, warn};
use rusqlite::Connection;
use std::path::Path;

/// Settings key of the supervisor-mode flag.
pub const SUPERVISOR_MODE_KEY: &str = "supervisor_mode";

/// Storage contract consumed by the board store.
pub trait PersistenceAdapter {
    /// Loads the stored board, or an empty one.
    fn load(&self) -> BoardState;
    /// Stores `state`; failures must not propagate.
    fn save(&self, state: &BoardState);
}

/// SQLite persistence owning its connection.
pub struct SqlitePersistence {
    conn: Connection,
}

impl SqlitePersistence {
    /// Opens (or creates) the board database at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// In-memory database, mostly for tests.
    pub fn in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Fallible load, for callers that need to tell "empty" from "broken".
    pub fn try_load(&self) -> RepoResult<Option<BoardState>> {
        SqliteBoardRepository::new(&self.conn).load_board()
    }

    /// Fallible save.
    pub fn try_save(&self, state: &BoardState) -> RepoResult<()> {
        SqliteBoardRepository::new(&self.conn).save_board(state)
    }

    /// Supervisor-mode flag; `false` when unset or unreadable.
    pub fn load_supervisor_mode(&self) -> bool {
        match SqliteBoardRepository::new(&self.conn).load_setting(SUPERVISOR_MODE_KEY) {
            Ok(value) => value.as_deref() == Some("1"),
            Err(err) => {
                warn!(
                    "event=setting_load module=persistence status=error key={SUPERVISOR_MODE_KEY} error={err}"
                );
                false
            }
        }
    }

    /// Stores the supervisor-mode flag, best effort.
    pub fn save_supervisor_mode(&self, enabled: bool) {
        let value = if enabled { "1" } else { "0" };
        if let Err(err) =
            SqliteBoardRepository::new(&self.conn).save_setting(SUPERVISOR_MODE_KEY, value)
        {
            warn!(
                "event=setting_save module=persistence status=error key={SUPERVISOR_MODE_KEY} error={err}"
            );
        }
    }
}

impl PersistenceAdapter for SqlitePersistence {
    fn load(&self) -> BoardState {
        match self.try_load() {
            Ok(Some(state)) => {
                debug!(
                    "event=board_load module=persistence status=ok tasks={} audit_events={}",
                    state.tasks.len(),
                    state.audit_log.len()
                );
                state
            }
            Ok(None) => {
                debug!("event=board_load module=persistence status=ok tasks=0 source=default");
                BoardState::empty()
            }
            Err(err) => {
                error!(
                    "event=board_load module=persistence status=error fallback=default error={err}"
                );
                BoardState::empty()
            }
        }
    }

    fn save(&self, state: &BoardState) {
        if let Err(err) = self.try_save(state) {
            error!("event=board_save module=persistence status=error error={err}");
        }
    }
}
