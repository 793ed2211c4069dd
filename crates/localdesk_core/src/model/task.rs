//! Task record model.
//!
//! # Invariants
//! - `id` is unique within the `tasks` store.
//! - `reminder` is the only field mutated in place after creation.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Integer key of a task record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TaskId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// One persisted task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub reminder: bool,
}

impl Task {
    pub fn new(id: TaskId, title: impl Into<String>, reminder: bool) -> Self {
        Self {
            id,
            title: title.into(),
            reminder,
        }
    }

    /// Flips the reminder flag and returns the new value.
    pub fn toggle_reminder(&mut self) -> bool {
        self.reminder = !self.reminder;
        self.reminder
    }
}

/// Input state of the add-task form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub reminder: bool,
}

impl TaskForm {
    pub fn new(title: impl Into<String>, reminder: bool) -> Self {
        Self {
            title: title.into(),
            reminder,
        }
    }

    /// Resets both inputs after a successful submit.
    pub fn clear(&mut self) {
        self.title.clear();
        self.reminder = false;
    }
}
