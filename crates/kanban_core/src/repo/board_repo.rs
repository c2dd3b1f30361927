//! Board snapshot repository and SQLite implementation.
//!
//! # Invariants
//! - Exactly one snapshot row per slot; saves overwrite it in place.
//! - Snapshots are stored as the export document JSON.

use crate::db::DbError;
use crate::model::board::BoardState;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot holding the live board.
pub const BOARD_SLOT: &str = "board";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for board persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Snapshot could not be encoded for storage.
    Encode(serde_json::Error),
    /// Persisted row exists but cannot be decoded.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode board snapshot: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted board data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Data-access contract for the board snapshot and small settings.
pub trait BoardRepository {
    /// `Ok(None)` when nothing was saved yet.
    fn load_board(&self) -> RepoResult<Option<BoardState>>;
    fn save_board(&self, state: &BoardState) -> RepoResult<()>;
    fn load_setting(&self, key: &str) -> RepoResult<Option<String>>;
    fn save_setting(&self, key: &str, value: &str) -> RepoResult<()>;
}

/// SQLite-backed board repository.
pub struct SqliteBoardRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBoardRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl BoardRepository for SqliteBoardRepository<'_> {
    fn load_board(&self) -> RepoResult<Option<BoardState>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM board_snapshots WHERE slot = ?1;",
                [BOARD_SLOT],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        let Some(payload) = payload else {
            return Ok(None);
        };

        serde_json::from_str::<BoardState>(&payload)
            .map(Some)
            .map_err(|err| {
                RepoError::InvalidData(format!("board_snapshots.payload for `{BOARD_SLOT}`: {err}"))
            })
    }

    fn save_board(&self, state: &BoardState) -> RepoResult<()> {
        let payload = serde_json::to_string(state).map_err(RepoError::Encode)?;
        self.conn.execute(
            "INSERT INTO board_snapshots (slot, payload) VALUES (?1, ?2)
             ON CONFLICT(slot) DO UPDATE SET
                payload = excluded.payload,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![BOARD_SLOT, payload],
        )?;
        Ok(())
    }

    fn load_setting(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?1;", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?)
    }

    fn save_setting(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}
