use kanban_core::db::migrations::{apply_migrations, latest_version, schema_version};
use kanban_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn in_memory_database_reaches_latest_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "board_snapshots");
    assert_table_exists(&conn, "settings");
}

#[test]
fn reopening_a_file_database_applies_nothing_new() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.db");

    drop(open_db(&path).unwrap());

    let mut conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_eq!(apply_migrations(&mut conn).unwrap(), 0);
}

#[test]
fn newer_schema_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 42;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 42);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn snapshot_payload_must_be_json() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO board_snapshots (slot, payload) VALUES ('board', 'not json');",
        [],
    );
    assert!(result.is_err());
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
