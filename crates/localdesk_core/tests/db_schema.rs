use localdesk_core::db::migrations::latest_version;
use localdesk_core::db::{open_db, open_db_in_dir, open_db_in_memory, DbError, CONTACT_DB, TASK_DB};
use localdesk_core::{RepoError, SqliteContactRepository, SqliteTaskRepository};
use rusqlite::Connection;

#[test]
fn open_in_memory_creates_each_record_store_at_version_one() {
    let tasks = open_db_in_memory(&TASK_DB).unwrap();
    assert_eq!(schema_version(&tasks), 1);
    assert_table_exists(&tasks, "tasks");

    let contacts = open_db_in_memory(&CONTACT_DB).unwrap();
    assert_eq!(schema_version(&contacts), 1);
    assert_table_exists(&contacts, "contacts");
}

#[test]
fn databases_do_not_share_stores() {
    let tasks = open_db_in_memory(&TASK_DB).unwrap();
    let exists: i64 = tasks
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE name = 'contacts');",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 0);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskDB.sqlite3");

    let first = open_db(&path, &TASK_DB).unwrap();
    first
        .execute("INSERT INTO tasks (title, reminder) VALUES ('keep', 0);", [])
        .unwrap();
    drop(first);

    let second = open_db(&path, &TASK_DB).unwrap();
    assert_eq!(schema_version(&second), latest_version(&TASK_DB));
    let count: i64 = second
        .query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn open_in_dir_creates_directory_and_named_file() {
    let root = tempfile::tempdir().unwrap();
    let data_dir = root.path().join("nested").join("data");

    let conn = open_db_in_dir(&data_dir, &CONTACT_DB).unwrap();
    drop(conn);

    assert!(data_dir.join("contactDB.sqlite3").is_file());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contactDB.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 7;").unwrap();
    drop(conn);

    match open_db(&path, &CONTACT_DB).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            database,
            db_version,
            latest_supported,
        } => {
            assert_eq!(database, "contactDB");
            assert_eq!(db_version, 7);
            assert_eq!(latest_supported, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteTaskRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            database,
            expected_version,
            actual_version,
        }) => {
            assert_eq!(database, "taskDB");
            assert_eq!(expected_version, 1);
            assert_eq!(actual_version, 0);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_of_the_other_database() {
    let conn = open_db_in_memory(&TASK_DB).unwrap();

    let result = SqliteContactRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("contacts"))
    ));
}

#[test]
fn repository_rejects_store_missing_a_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE contacts (id TEXT PRIMARY KEY NOT NULL, name TEXT NOT NULL);
         PRAGMA user_version = 1;",
    )
    .unwrap();

    let result = SqliteContactRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "contacts",
            column: "email"
        })
    ));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
