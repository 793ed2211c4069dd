//! FFI use-case API for host UI calls.
//!
//! # Responsibility
//! - Expose task and contact widget operations as flat, sync functions.
//! - Turn every failure into an envelope message instead of a panic.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Each call opens its own connection and reloads the widget from storage.
//! - Calls are stateless, so a reminder toggle here is always written through.

use localdesk_core::db::open_db_in_dir;
use localdesk_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Contact, ContactForm, ContactManager, ContactManagerError, SqliteContactRepository,
    SqliteTaskRepository, Task, TaskId, TaskManager, TaskManagerError, TaskManagerOptions,
    CONTACT_DB, TASK_DB,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const DATA_DIR_ENV: &str = "LOCALDESK_DATA_DIR";
const DEFAULT_DATA_DIR_NAME: &str = "localdesk";
static DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Exposes the core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns an empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Task row as seen by the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: i64,
    pub title: String,
    pub reminder: bool,
}

/// Contact row as seen by the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactItem {
    /// Hyphenated UUID string.
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// List envelope returned by task read calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub ok: bool,
    pub items: Vec<TaskItem>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

/// List envelope returned by contact read calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListResponse {
    pub ok: bool,
    pub items: Vec<ContactItem>,
    pub message: String,
}

fn loaded_message(count: usize) -> String {
    format!("Loaded {count} record(s).")
}

/// Result envelope returned by write calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Key of the affected record, when the call produced one.
    pub record_id: Option<String>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, record_id: Option<String>) -> Self {
        Self {
            ok: true,
            record_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            record_id: None,
            message: message.into(),
        }
    }
}

/// Lists every stored task.
#[flutter_rust_bridge::frb(sync)]
pub fn task_list() -> TaskListResponse {
    match with_task_manager(TaskManagerOptions::default(), |manager| {
        Ok(manager.tasks().iter().map(to_task_item).collect::<Vec<_>>())
    }) {
        Ok(items) => TaskListResponse {
            ok: true,
            message: loaded_message(items.len()),
            items,
        },
        Err(err) => TaskListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("task_list failed: {err}"),
        },
    }
}

/// Lists stored tasks with a reminder set, in list order.
#[flutter_rust_bridge::frb(sync)]
pub fn task_reminders() -> TaskListResponse {
    match with_task_manager(TaskManagerOptions::default(), |manager| {
        Ok(manager
            .reminder_tasks()
            .into_iter()
            .map(to_task_item)
            .collect::<Vec<_>>())
    }) {
        Ok(items) => TaskListResponse {
            ok: true,
            message: loaded_message(items.len()),
            items,
        },
        Err(err) => TaskListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("task_reminders failed: {err}"),
        },
    }
}

/// Adds a task; the store assigns its id.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(title: String, reminder: bool) -> ActionResponse {
    match with_task_manager(TaskManagerOptions::default(), |manager| {
        manager.set_title(title);
        manager.set_reminder(reminder);
        manager.add_task()
    }) {
        Ok(task) => ActionResponse::success("Task added.", Some(task.id.to_string())),
        Err(err) => ActionResponse::failure(format!("task_add failed: {err}")),
    }
}

/// Deletes a task by id. Unknown ids succeed without effect.
#[flutter_rust_bridge::frb(sync)]
pub fn task_delete(id: i64) -> ActionResponse {
    match with_task_manager(TaskManagerOptions::default(), |manager| {
        manager.delete_task(TaskId(id))
    }) {
        Ok(()) => ActionResponse::success("Task deleted.", Some(id.to_string())),
        Err(err) => ActionResponse::failure(format!("task_delete failed: {err}")),
    }
}

/// Flips and persists a task's reminder flag.
#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle_reminder(id: i64) -> ActionResponse {
    let options = TaskManagerOptions {
        persist_reminder_toggle: true,
        ..TaskManagerOptions::default()
    };
    match with_task_manager(options, |manager| manager.toggle_reminder(TaskId(id))) {
        Ok(true) => ActionResponse::success("Reminder enabled.", Some(id.to_string())),
        Ok(false) => ActionResponse::success("Reminder disabled.", Some(id.to_string())),
        Err(err) => ActionResponse::failure(format!("task_toggle_reminder failed: {err}")),
    }
}

/// Lists every stored contact.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_list() -> ContactListResponse {
    match with_contact_manager(|manager| {
        Ok(manager.contacts().iter().map(to_contact_item).collect::<Vec<_>>())
    }) {
        Ok(items) => ContactListResponse {
            ok: true,
            message: loaded_message(items.len()),
            items,
        },
        Err(err) => ContactListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("contact_list failed: {err}"),
        },
    }
}

/// Adds a contact under a freshly generated id.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_add(name: String, email: String, phone: String) -> ActionResponse {
    match with_contact_manager(|manager| {
        *manager.form_mut() = ContactForm::new(name, email, phone);
        manager.add_contact()
    }) {
        Ok(contact) => ActionResponse::success("Contact added.", Some(contact.id.to_string())),
        Err(err) => ActionResponse::failure(format!("contact_add failed: {err}")),
    }
}

/// Replaces every field of an existing contact.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_update(id: String, name: String, email: String, phone: String) -> ActionResponse {
    let contact_id = match parse_contact_id(&id) {
        Ok(contact_id) => contact_id,
        Err(err) => return ActionResponse::failure(format!("contact_update failed: {err}")),
    };

    match with_contact_manager(|manager| {
        manager.begin_edit(contact_id)?;
        *manager.form_mut() = ContactForm::new(name, email, phone);
        manager.update_contact()
    }) {
        Ok(contact) => ActionResponse::success("Contact updated.", Some(contact.id.to_string())),
        Err(err) => ActionResponse::failure(format!("contact_update failed: {err}")),
    }
}

/// Deletes a contact by id. Unknown ids succeed without effect.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_delete(id: String) -> ActionResponse {
    let contact_id = match parse_contact_id(&id) {
        Ok(contact_id) => contact_id,
        Err(err) => return ActionResponse::failure(format!("contact_delete failed: {err}")),
    };

    match with_contact_manager(|manager| manager.delete_contact(contact_id)) {
        Ok(()) => ActionResponse::success("Contact deleted.", Some(contact_id.to_string())),
        Err(err) => ActionResponse::failure(format!("contact_delete failed: {err}")),
    }
}

fn resolve_data_dir() -> PathBuf {
    DATA_DIR
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DATA_DIR_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DEFAULT_DATA_DIR_NAME)
        })
        .clone()
}

fn parse_contact_id(raw: &str) -> Result<Uuid, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid contact id `{raw}`"))
}

fn with_task_manager<T>(
    options: TaskManagerOptions,
    f: impl FnOnce(&mut TaskManager<SqliteTaskRepository<'_>>) -> Result<T, TaskManagerError>,
) -> Result<T, String> {
    let conn = open_db_in_dir(resolve_data_dir(), &TASK_DB)
        .map_err(|err| format!("task DB open failed: {err}"))?;
    let repo = SqliteTaskRepository::try_new(&conn)
        .map_err(|err| format!("task repo init failed: {err}"))?;
    let mut manager = TaskManager::with_options(repo, options);
    manager.load().map_err(|err| err.to_string())?;
    f(&mut manager).map_err(|err| {
        warn!("event=ffi_call module=ffi status=error widget=tasks error={err}");
        err.to_string()
    })
}

fn with_contact_manager<T>(
    f: impl FnOnce(
        &mut ContactManager<SqliteContactRepository<'_>>,
    ) -> Result<T, ContactManagerError>,
) -> Result<T, String> {
    let conn = open_db_in_dir(resolve_data_dir(), &CONTACT_DB)
        .map_err(|err| format!("contact DB open failed: {err}"))?;
    let repo = SqliteContactRepository::try_new(&conn)
        .map_err(|err| format!("contact repo init failed: {err}"))?;
    let mut manager = ContactManager::new(repo);
    manager.load().map_err(|err| err.to_string())?;
    f(&mut manager).map_err(|err| {
        warn!("event=ffi_call module=ffi status=error widget=contacts error={err}");
        err.to_string()
    })
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.0,
        title: task.title.clone(),
        reminder: task.reminder,
    }
}

fn to_contact_item(contact: &Contact) -> ContactItem {
    ContactItem {
        id: contact.id.to_string(),
        name: contact.name.clone(),
        email: contact.email.clone(),
        phone: contact.phone.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        contact_add, contact_delete, contact_list, contact_update, core_version, init_logging,
        ping, task_add, task_delete, task_list, task_reminders, task_toggle_reminder,
    };
    use localdesk_core::db::open_db_in_dir;
    use localdesk_core::TASK_DB;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn task_add_then_list_returns_created_task() {
        let title = unique_token("task-add");
        let created = task_add(title.clone(), false);
        assert!(created.ok, "{}", created.message);
        let id = created.record_id.expect("task add should return id");

        let listed = task_list();
        assert!(listed.ok, "{}", listed.message);
        assert!(listed
            .items
            .iter()
            .any(|item| item.id.to_string() == id && item.title == title && !item.reminder));
    }

    #[test]
    fn task_toggle_reminder_is_written_through() {
        let created = task_add(unique_token("task-toggle"), false);
        let id: i64 = created.record_id.unwrap().parse().unwrap();

        let toggled = task_toggle_reminder(id);
        assert!(toggled.ok, "{}", toggled.message);
        assert_eq!(toggled.message, "Reminder enabled.");

        let conn = open_db_in_dir(super::resolve_data_dir(), &TASK_DB).expect("open db");
        let reminder: i64 = conn
            .query_row("SELECT reminder FROM tasks WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .expect("query task row");
        assert_eq!(reminder, 1);
        assert!(task_reminders().items.iter().any(|item| item.id == id));
    }

    #[test]
    fn task_toggle_of_unknown_id_fails() {
        let response = task_toggle_reminder(-1);
        assert!(!response.ok);
        assert!(response.message.contains("task not found"));
    }

    #[test]
    fn task_delete_removes_task() {
        let created = task_add(unique_token("task-delete"), true);
        let id: i64 = created.record_id.unwrap().parse().unwrap();

        assert!(task_delete(id).ok);
        assert!(task_list().items.iter().all(|item| item.id != id));
    }

    #[test]
    fn contact_add_update_delete_flow() {
        let name = unique_token("contact");
        let created = contact_add(name, "a@example.com".to_string(), "1".to_string());
        assert!(created.ok, "{}", created.message);
        let id = created.record_id.unwrap();

        let renamed = unique_token("renamed");
        let updated = contact_update(
            id.clone(),
            renamed.clone(),
            "b@example.com".to_string(),
            "2".to_string(),
        );
        assert!(updated.ok, "{}", updated.message);

        let matching: Vec<_> = contact_list()
            .items
            .into_iter()
            .filter(|item| item.id == id)
            .collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].name, renamed);
        assert_eq!(matching[0].email, "b@example.com");

        assert!(contact_delete(id.clone()).ok);
        assert!(contact_list().items.iter().all(|item| item.id != id));
    }

    #[test]
    fn contact_update_rejects_malformed_id() {
        let response = contact_update(
            "not-a-uuid".to_string(),
            String::new(),
            String::new(),
            String::new(),
        );
        assert!(!response.ok);
        assert!(response.message.contains("invalid contact id"));
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
