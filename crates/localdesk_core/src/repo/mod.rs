//! Record-store repositories and their SQLite implementations.
//!
//! # Responsibility
//! - Expose the storage primitives the widgets consume: get-all, add, put,
//!   delete.
//! - Keep SQL details behind repository traits.
//!
//! # Invariants
//! - Repositories only accept connections whose schema upgrade completed.
//! - `add` never overwrites; a key collision is a `DuplicateKey` error.
//! - `put` inserts or fully replaces the record under its key.
//! - `delete` of an absent key succeeds and reports that nothing was removed.

use crate::db::migrations::current_user_version;
use crate::db::{DatabaseSchema, DbError};
use crate::model::contact::ContactId;
use crate::model::task::TaskId;
use rusqlite::{Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod contact_repo;
pub mod task_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Key of a record in either store, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKey {
    Task(TaskId),
    Contact(ContactId),
}

impl Display for RecordKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Task(id) => write!(f, "tasks/{id}"),
            Self::Contact(id) => write!(f, "contacts/{id}"),
        }
    }
}

/// Repository error for record-store reads and writes.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// `add` hit an existing record under the same key.
    DuplicateKey(RecordKey),
    InvalidData(String),
    UninitializedConnection {
        database: &'static str,
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateKey(key) => write!(f, "record already exists: {key}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record: {message}"),
            Self::UninitializedConnection {
                database,
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection for `{database}` is at schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
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

/// Maps a constraint violation on insert to `DuplicateKey`.
pub(crate) fn map_insert_error(err: rusqlite::Error, key: RecordKey) -> RepoError {
    match err.sqlite_error_code() {
        Some(ErrorCode::ConstraintViolation) => RepoError::DuplicateKey(key),
        _ => err.into(),
    }
}

/// Verifies that `conn` carries the upgraded schema of `schema`.
pub(crate) fn ensure_store_ready(conn: &Connection, schema: &DatabaseSchema) -> RepoResult<()> {
    let expected_version = schema.latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            database: schema.name,
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, schema.store)? {
        return Err(RepoError::MissingRequiredTable(schema.store));
    }

    for &column in schema.columns {
        if !table_has_column(conn, schema.store, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: schema.store,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
