//! SQLite storage bootstrap for the local record stores.
//!
//! # Responsibility
//! - Describe each database (`taskDB`, `contactDB`) and its single record store.
//! - Open and configure SQLite connections, running the schema upgrade first.
//!
//! # Invariants
//! - One SQLite file per database, named `<database>.sqlite3`.
//! - Schema version is tracked via `PRAGMA user_version`.
//! - No record is read or written before the upgrade succeeds.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;
mod schema;

pub use open::{open_db, open_db_in_dir, open_db_in_memory};
pub use schema::{DatabaseSchema, KeyKind, CONTACT_DB, TASK_DB};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    UnsupportedSchemaVersion {
        database: &'static str,
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Io { path, source } => {
                write!(f, "cannot prepare data directory `{}`: {source}", path.display())
            }
            Self::UnsupportedSchemaVersion {
                database,
                db_version,
                latest_supported,
            } => write!(
                f,
                "database `{database}` schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
