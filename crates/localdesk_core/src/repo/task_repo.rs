//! `tasks` record-store contract and SQLite implementation.
//!
//! # Invariants
//! - Reads return records in ascending key order.
//! - When `add_task` gets no id, SQLite `AUTOINCREMENT` assigns one that is
//!   never reused, even after deletes.

use crate::db::TASK_DB;
use crate::model::task::{Task, TaskId};
use crate::repo::{ensure_store_ready, map_insert_error, RecordKey, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT id, title, reminder FROM tasks";

/// Storage primitives over the `tasks` record store.
pub trait TaskRepository {
    /// Reads every stored task.
    fn get_all_tasks(&self) -> RepoResult<Vec<Task>>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Inserts a new record. `id = None` lets the store assign the key.
    fn add_task(&self, id: Option<TaskId>, title: &str, reminder: bool) -> RepoResult<Task>;
    /// Inserts or fully replaces the record under `task.id`.
    fn put_task(&self, task: &Task) -> RepoResult<()>;
    /// Removes the record; returns whether one existed.
    fn delete_task(&self, id: TaskId) -> RepoResult<bool>;
}

/// SQLite-backed `tasks` store.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a connection opened with `TASK_DB`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_store_ready(conn, &TASK_DB)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn get_all_tasks(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.0])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn add_task(&self, id: Option<TaskId>, title: &str, reminder: bool) -> RepoResult<Task> {
        let assigned = match id {
            Some(id) => {
                self.conn
                    .execute(
                        "INSERT INTO tasks (id, title, reminder) VALUES (?1, ?2, ?3);",
                        params![id.0, title, reminder],
                    )
                    .map_err(|err| map_insert_error(err, RecordKey::Task(id)))?;
                id
            }
            None => {
                self.conn.execute(
                    "INSERT INTO tasks (title, reminder) VALUES (?1, ?2);",
                    params![title, reminder],
                )?;
                TaskId(self.conn.last_insert_rowid())
            }
        };

        Ok(Task::new(assigned, title, reminder))
    }

    fn put_task(&self, task: &Task) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO tasks (id, title, reminder) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                reminder = excluded.reminder;",
            params![task.id.0, task.title.as_str(), task.reminder],
        )?;
        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<bool> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1;", [id.0])?;
        Ok(changed > 0)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id = TaskId(row.get("id")?);
    let reminder = match row.get::<_, i64>("reminder")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid reminder value `{other}` in tasks.reminder for id {id}"
            )));
        }
    };

    Ok(Task {
        id,
        title: row.get("title")?,
        reminder,
    })
}
