use catalog_core::db::migrations::latest_version;
use catalog_core::db::{open_db, open_db_from_env, open_db_in_memory, DbError, DB_PATH_ENV};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "products");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "products");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

// Single test for both env-var outcomes: the variable is process-wide state,
// so splitting these would race under the parallel test runner.
#[test]
fn open_db_from_env_requires_and_honors_database_path() {
    std::env::remove_var(DB_PATH_ENV);
    let err = open_db_from_env().unwrap_err();
    assert!(matches!(err, DbError::MissingConfig(DB_PATH_ENV)));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");
    std::env::set_var(DB_PATH_ENV, &path);

    let conn = open_db_from_env().unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "products");
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
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
    assert_eq!(exists, 1, "expected table `{table_name}` to exist");
}
