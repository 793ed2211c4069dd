//! Core of the local task and contact widgets.
//!
//! Each widget keeps an in-memory record list mirrored into its own local
//! SQLite record store with write-through semantics.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use db::{open_db, open_db_in_dir, open_db_in_memory, DbError, CONTACT_DB, TASK_DB};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::contact::{Contact, ContactForm, ContactId};
pub use model::task::{Task, TaskForm, TaskId};
pub use repo::contact_repo::{ContactRepository, SqliteContactRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RecordKey, RepoError, RepoResult};
pub use service::contact_manager::{ContactManager, ContactManagerError};
pub use service::task_manager::{
    TaskIdPolicy, TaskManager, TaskManagerError, TaskManagerOptions,
};
pub use service::Reconciliation;
pub use view::{ContactListView, ContactRow, Emphasis, TaskListView, TaskRow};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
