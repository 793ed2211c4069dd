//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections for one database schema.
//! - Run the schema upgrade before returning a usable connection.
//!
//! # Invariants
//! - Returned connections have migrations fully applied.
//! - Every open emits one `db_open` start event and one terminal event.

use super::migrations::apply_migrations;
use super::{DatabaseSchema, DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Opens (or creates) the database file at `path` and applies its upgrade.
///
/// # Side effects
/// - Creates the file when absent.
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>, schema: &DatabaseSchema) -> DbResult<Connection> {
    let path = path.as_ref();
    open_with(schema, "file", || Connection::open(path))
}

/// Opens `<dir>/<database>.sqlite3`, creating `dir` when needed.
pub fn open_db_in_dir(dir: impl AsRef<Path>, schema: &DatabaseSchema) -> DbResult<Connection> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|source| DbError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    open_db(schema.path_in(dir), schema)
}

/// Opens a private in-memory database and applies its upgrade.
pub fn open_db_in_memory(schema: &DatabaseSchema) -> DbResult<Connection> {
    open_with(schema, "memory", Connection::open_in_memory)
}

fn open_with(
    schema: &DatabaseSchema,
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!(
        "event=db_open module=db status=start mode={mode} database={}",
        schema.name
    );

    let mut conn = match connect() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} database={} duration_ms={} error_code=db_open_failed error={}",
                schema.name,
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap_connection(&mut conn, schema) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} database={} duration_ms={}",
                schema.name,
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} database={} duration_ms={} error_code=db_upgrade_failed error={}",
                schema.name,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection, schema: &DatabaseSchema) -> DbResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    apply_migrations(conn, schema)?;
    Ok(())
}
