//! Static descriptions of the two local databases.

use super::migrations::{Migration, CONTACT_MIGRATIONS, TASK_MIGRATIONS};
use std::path::{Path, PathBuf};

/// How records in a store obtain their key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Integer key, assigned by the store when the caller omits it.
    AutoIncrement,
    /// Key supplied by the caller on every insert.
    External,
}

/// One database holding exactly one record store.
#[derive(Debug, Clone, Copy)]
pub struct DatabaseSchema {
    /// Database name, also used as the file stem.
    pub name: &'static str,
    /// Record store (table) name.
    pub store: &'static str,
    /// Key path column inside the record store.
    pub key_path: &'static str,
    pub key_kind: KeyKind,
    /// Every column a ready connection must expose on `store`.
    pub columns: &'static [&'static str],
    pub(crate) migrations: &'static [Migration],
}

impl DatabaseSchema {
    /// File name used when the database lives in a data directory.
    pub fn file_name(&self) -> String {
        format!("{}.sqlite3", self.name)
    }

    /// Full path of the database file under `dir`.
    pub fn path_in(&self, dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join(self.file_name())
    }

    /// Latest schema version known by this binary.
    pub fn latest_version(&self) -> u32 {
        self.migrations
            .last()
            .map_or(0, |migration| migration.version)
    }
}

/// `taskDB` v1: store `tasks`, key path `id`, auto-incrementing.
pub const TASK_DB: DatabaseSchema = DatabaseSchema {
    name: "taskDB",
    store: "tasks",
    key_path: "id",
    key_kind: KeyKind::AutoIncrement,
    columns: &["id", "title", "reminder"],
    migrations: TASK_MIGRATIONS,
};

/// `contactDB` v1: store `contacts`, key path `id`, generated string keys.
pub const CONTACT_DB: DatabaseSchema = DatabaseSchema {
    name: "contactDB",
    store: "contacts",
    key_path: "id",
    key_kind: KeyKind::External,
    columns: &["id", "name", "email", "phone"],
    migrations: CONTACT_MIGRATIONS,
};

#[cfg(test)]
mod tests {
    use super::{KeyKind, CONTACT_DB, TASK_DB};
    use std::path::Path;

    #[test]
    fn both_databases_start_at_version_one() {
        assert_eq!(TASK_DB.latest_version(), 1);
        assert_eq!(CONTACT_DB.latest_version(), 1);
    }

    #[test]
    fn file_names_follow_database_names() {
        assert_eq!(
            TASK_DB.path_in("/data"),
            Path::new("/data").join("taskDB.sqlite3")
        );
        assert_eq!(CONTACT_DB.file_name(), "contactDB.sqlite3");
    }

    #[test]
    fn key_kinds_match_store_contracts() {
        assert_eq!(TASK_DB.key_kind, KeyKind::AutoIncrement);
        assert_eq!(CONTACT_DB.key_kind, KeyKind::External);
    }
}
