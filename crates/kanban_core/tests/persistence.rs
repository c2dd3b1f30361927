use kanban_core::db::open_db;
use kanban_core::{
    BoardConfig, BoardRepository, BoardState, BoardStore, PersistenceAdapter, Priority,
    RepoError, SqliteBoardRepository, SqlitePersistence, TaskInput,
};

#[test]
fn empty_database_loads_default_board() {
    let persistence = SqlitePersistence::in_memory().unwrap();
    assert_eq!(persistence.load(), BoardState::empty());
    assert!(persistence.try_load().unwrap().is_none());
}

#[test]
fn store_snapshots_after_each_mutation_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.db");

    let expected = {
        let mut store = BoardStore::open(SqlitePersistence::open(&path).unwrap(), BoardConfig::default());
        let id = store.create_task(&TaskInput::new("Persist me", Priority::High, 40));
        store.create_task(&TaskInput::new("Delete me", Priority::Low, 5));
        let doomed = store.state().columns.todo[0].clone();
        assert!(store.delete_task(&doomed));
        assert!(store.task(&id).is_some());
        store.into_state()
    };

    let reopened = SqlitePersistence::open(&path).unwrap();
    assert_eq!(reopened.load(), expected);

    let store = BoardStore::open(reopened, BoardConfig::default());
    assert_eq!(store.state(), &expected);
}

#[test]
fn no_op_mutation_does_not_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.db");

    let mut store = BoardStore::open(SqlitePersistence::open(&path).unwrap(), BoardConfig::default());
    assert!(!store.delete_task("missing"));

    let reopened = SqlitePersistence::open(&path).unwrap();
    assert!(reopened.try_load().unwrap().is_none());
}

#[test]
fn corrupt_snapshot_falls_back_to_empty_board() {
    let persistence = SqlitePersistence::in_memory().unwrap();
    persistence
        .connection()
        .execute(
            "INSERT INTO board_snapshots (slot, payload) VALUES ('board', '{\"tasks\": 3}');",
            [],
        )
        .unwrap();

    assert!(matches!(
        persistence.try_load(),
        Err(RepoError::InvalidData(_))
    ));
    assert_eq!(persistence.load(), BoardState::empty());
}

#[test]
fn save_overwrites_single_slot() {
    let dir = tempfile::tempdir().unwrap();
    let conn = open_db(dir.path().join("board.db")).unwrap();
    let repo = SqliteBoardRepository::new(&conn);

    let mut store = BoardStore::default();
    store.create_task(&TaskInput::new("First save", Priority::Low, 5));
    repo.save_board(store.state()).unwrap();
    store.create_task(&TaskInput::new("Second save", Priority::Low, 5));
    repo.save_board(store.state()).unwrap();

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM board_snapshots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
    assert_eq!(repo.load_board().unwrap().as_ref(), Some(store.state()));
}

#[test]
fn supervisor_mode_defaults_off_and_round_trips() {
    let persistence = SqlitePersistence::in_memory().unwrap();
    assert!(!persistence.load_supervisor_mode());

    persistence.save_supervisor_mode(true);
    assert!(persistence.load_supervisor_mode());

    persistence.save_supervisor_mode(false);
    assert!(!persistence.load_supervisor_mode());
}

#[test]
fn settings_are_upserted() {
    let persistence = SqlitePersistence::in_memory().unwrap();
    let repo = SqliteBoardRepository::new(persistence.connection());

    assert_eq!(repo.load_setting("theme").unwrap(), None);
    repo.save_setting("theme", "dark").unwrap();
    repo.save_setting("theme", "light").unwrap();
    assert_eq!(repo.load_setting("theme").unwrap().as_deref(), Some("light"));
}

#[test]
fn failed_snapshot_write_keeps_in_memory_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.db");
    open_db(&path)
        .unwrap()
        .execute_batch("DROP TABLE board_snapshots;")
        .unwrap();

    let mut store = BoardStore::open(SqlitePersistence::open(&path).unwrap(), BoardConfig::default());
    let id = store.create_task(&TaskInput::new("Unsaved task", Priority::Medium, 25));

    assert_eq!(store.task(&id).unwrap().title, "Unsaved task");
    assert_eq!(store.state().columns.todo, vec![id]);
    assert_eq!(store.state().audit_log.len(), 1);

    let persistence = SqlitePersistence::open(&path).unwrap();
    assert!(persistence.try_save(store.state()).is_err());
    assert!(persistence.try_load().is_err());
    assert_eq!(persistence.load(), BoardState::empty());
}
