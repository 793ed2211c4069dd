//! Task manager component.
//!
//! # Responsibility
//! - Load all stored tasks into memory and keep the add-task form state.
//! - Write adds and deletes through to the `tasks` store before updating
//!   memory.
//! - Provide the reminder toggle and the reminders-only view.
//!
//! # Invariants
//! - In-memory order is load order followed by add order.
//! - Reminder toggles stay in memory unless `persist_reminder_toggle` is set.
//! - With `TaskIdPolicy::ListLengthPlusOne`, ids are `len + 1` and may
//!   collide after a delete; the collision is returned, never overwritten.

use crate::model::task::{Task, TaskForm, TaskId};
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoError;
use crate::service::{diff_records, Reconciliation};
use crate::view::{render_tasks, TaskListView};
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Source of identity for newly added tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskIdPolicy {
    /// The store's auto-increment key is the only source of identity.
    #[default]
    StoreAssigned,
    /// `in-memory count + 1`; ids can repeat once records are deleted.
    ListLengthPlusOne,
}

/// Behaviour switches for [`TaskManager`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskManagerOptions {
    pub id_policy: TaskIdPolicy,
    /// Write reminder toggles through to the store.
    pub persist_reminder_toggle: bool,
}

/// Errors from task manager operations.
#[derive(Debug)]
pub enum TaskManagerError {
    /// No in-memory task carries this id.
    TaskNotFound(TaskId),
    /// Record-store failure; memory was left unchanged.
    Repo(RepoError),
}

impl Display for TaskManagerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskManagerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::TaskNotFound(_) => None,
        }
    }
}

impl From<RepoError> for TaskManagerError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Task widget state over a `tasks` repository.
pub struct TaskManager<R: TaskRepository> {
    repo: R,
    options: TaskManagerOptions,
    tasks: Vec<Task>,
    form: TaskForm,
    show_reminders: bool,
    last_error: Option<String>,
}

impl<R: TaskRepository> TaskManager<R> {
    /// Creates an empty component with default options. Call [`Self::load`]
    /// before use.
    pub fn new(repo: R) -> Self {
        Self::with_options(repo, TaskManagerOptions::default())
    }

    pub fn with_options(repo: R, options: TaskManagerOptions) -> Self {
        Self {
            repo,
            options,
            tasks: Vec::new(),
            form: TaskForm::default(),
            show_reminders: false,
            last_error: None,
        }
    }

    pub fn options(&self) -> TaskManagerOptions {
        self.options
    }

    /// Replaces the in-memory list with every stored task.
    pub fn load(&mut self) -> Result<usize, TaskManagerError> {
        let started_at = Instant::now();
        match self.repo.get_all_tasks() {
            Ok(tasks) => {
                self.tasks = tasks;
                self.last_error = None;
                info!(
                    "event=task_load module=task_manager status=ok count={} duration_ms={}",
                    self.tasks.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(self.tasks.len())
            }
            Err(err) => Err(self.fail("task_load", err.into())),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn form(&self) -> &TaskForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut TaskForm {
        &mut self.form
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.form.title = title.into();
    }

    pub fn set_reminder(&mut self, reminder: bool) {
        self.form.reminder = reminder;
    }

    /// Adds a task from the current form contents.
    ///
    /// On success the new task is appended and the form is cleared. On
    /// failure both stay as they were.
    pub fn add_task(&mut self) -> Result<Task, TaskManagerError> {
        let id = match self.options.id_policy {
            TaskIdPolicy::StoreAssigned => None,
            TaskIdPolicy::ListLengthPlusOne => Some(TaskId(self.tasks.len() as i64 + 1)),
        };

        match self
            .repo
            .add_task(id, self.form.title.as_str(), self.form.reminder)
        {
            Ok(task) => {
                info!(
                    "event=task_add module=task_manager status=ok task_id={} reminder={}",
                    task.id, task.reminder
                );
                self.tasks.push(task.clone());
                self.form.clear();
                self.last_error = None;
                Ok(task)
            }
            Err(err) => Err(self.fail("task_add", err.into())),
        }
    }

    /// Deletes a task from the store, then from memory.
    ///
    /// Deleting an id the store no longer holds still succeeds and drops any
    /// stale in-memory copy.
    pub fn delete_task(&mut self, id: TaskId) -> Result<(), TaskManagerError> {
        match self.repo.delete_task(id) {
            Ok(existed) => {
                if !existed {
                    warn!(
                        "event=task_delete module=task_manager status=ok task_id={id} stored=false"
                    );
                }
                self.tasks.retain(|task| task.id != id);
                self.last_error = None;
                info!("event=task_delete module=task_manager status=ok task_id={id}");
                Ok(())
            }
            Err(err) => Err(self.fail("task_delete", err.into())),
        }
    }

    /// Flips the reminder flag of one task and returns the new value.
    pub fn toggle_reminder(&mut self, id: TaskId) -> Result<bool, TaskManagerError> {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            return Err(self.fail("task_toggle_reminder", TaskManagerError::TaskNotFound(id)));
        };

        let mut toggled = self.tasks[index].clone();
        let reminder = toggled.toggle_reminder();
        if self.options.persist_reminder_toggle {
            if let Err(err) = self.repo.put_task(&toggled) {
                return Err(self.fail("task_toggle_reminder", err.into()));
            }
        }

        self.tasks[index] = toggled;
        self.last_error = None;
        info!(
            "event=task_toggle_reminder module=task_manager status=ok task_id={id} reminder={reminder} persisted={}",
            self.options.persist_reminder_toggle
        );
        Ok(reminder)
    }

    /// Shows or hides the reminders-only list; returns the new visibility.
    pub fn toggle_show_reminders(&mut self) -> bool {
        self.show_reminders = !self.show_reminders;
        self.show_reminders
    }

    pub fn is_showing_reminders(&self) -> bool {
        self.show_reminders
    }

    /// Tasks with `reminder = true`, in list order.
    pub fn reminder_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|task| task.reminder).collect()
    }

    pub fn view(&self) -> TaskListView {
        render_tasks(&self.tasks, self.show_reminders)
    }

    /// Message of the most recent failed operation, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Compares memory against the store, then reloads memory from the store.
    pub fn reconcile(&mut self) -> Result<Reconciliation<TaskId>, TaskManagerError> {
        let stored = match self.repo.get_all_tasks() {
            Ok(stored) => stored,
            Err(err) => return Err(self.fail("task_reconcile", err.into())),
        };

        let report = diff_records(&self.tasks, &stored, |task| task.id);
        if !report.is_consistent() {
            warn!(
                "event=task_reconcile module=task_manager status=diverged memory_only={} store_only={} diverged={}",
                report.memory_only.len(),
                report.store_only.len(),
                report.diverged.len()
            );
        }
        self.tasks = stored;
        self.last_error = None;
        Ok(report)
    }

    fn fail(&mut self, event: &'static str, err: TaskManagerError) -> TaskManagerError {
        error!("event={event} module=task_manager status=error error={err}");
        self.last_error = Some(err.to_string());
        err
    }
}
