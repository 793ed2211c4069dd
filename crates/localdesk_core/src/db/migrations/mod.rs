//! Per-database schema upgrade registry and executor.
//!
//! # Responsibility
//! - Register each database's migrations in strictly increasing order.
//! - Apply pending migrations atomically when a database is opened.
//!
//! # Invariants
//! - `version` values must remain monotonic within one registry.
//! - Applied version is mirrored to `PRAGMA user_version`.
//! - Both databases currently stop at version 1.

use crate::db::{DatabaseSchema, DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Migration {
    pub(crate) version: u32,
    pub(crate) sql: &'static str,
}

pub(crate) const TASK_MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_tasks.sql"),
}];

pub(crate) const CONTACT_MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_contacts.sql"),
}];

/// Returns the latest migration version known for `schema`.
pub fn latest_version(schema: &DatabaseSchema) -> u32 {
    schema.latest_version()
}

/// Applies all pending migrations of `schema` on the provided connection.
pub fn apply_migrations(conn: &mut Connection, schema: &DatabaseSchema) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    let latest = schema.latest_version();

    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            database: schema.name,
            db_version: current_version,
            latest_supported: latest,
        });
    }

    if current_version == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in schema.migrations {
        if migration.version <= current_version {
            continue;
        }

        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    info!(
        "event=db_upgrade module=db status=ok database={} from_version={} to_version={}",
        schema.name, current_version, latest
    );
    Ok(())
}

/// Reads `PRAGMA user_version` from a connection.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
