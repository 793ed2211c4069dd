//! Render projections for the two widgets.
//!
//! Pure functions from component state to display rows. Hosts map
//! [`Emphasis`] and the labels onto their own widgets.

use crate::model::contact::{Contact, ContactForm, ContactId};
use crate::model::task::{Task, TaskId};

/// Visual weight of a task title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    /// Reminder set; drawn in the alert colour.
    Highlighted,
    Muted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: TaskId,
    pub title: String,
    pub emphasis: Emphasis,
    /// Label of the per-row reminder button.
    pub toggle_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListView {
    pub rows: Vec<TaskRow>,
    pub reminders_button_label: &'static str,
    /// Reminders-only rows; `None` while the list is hidden.
    pub reminder_rows: Option<Vec<TaskRow>>,
}

/// Projects the task list and the optional reminders-only list.
pub fn render_tasks(tasks: &[Task], show_reminders: bool) -> TaskListView {
    let rows = tasks.iter().map(task_row).collect();
    let reminder_rows = show_reminders.then(|| {
        tasks
            .iter()
            .filter(|task| task.reminder)
            .map(task_row)
            .collect()
    });

    TaskListView {
        rows,
        reminders_button_label: if show_reminders {
            "Hide Reminders"
        } else {
            "Show Reminders"
        },
        reminder_rows,
    }
}

fn task_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id,
        title: task.title.clone(),
        emphasis: if task.reminder {
            Emphasis::Highlighted
        } else {
            Emphasis::Muted
        },
        toggle_label: if task.reminder {
            "Disable Reminder"
        } else {
            "Enable Reminder"
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRow {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListView {
    pub rows: Vec<ContactRow>,
    pub form: ContactForm,
    /// `Update Contact` in edit mode, `Add Contact` otherwise.
    pub submit_label: &'static str,
}

pub fn render_contacts(contacts: &[Contact], form: &ContactForm, editing: bool) -> ContactListView {
    ContactListView {
        rows: contacts
            .iter()
            .map(|contact| ContactRow {
                id: contact.id,
                name: contact.name.clone(),
                email: contact.email.clone(),
                phone: contact.phone.clone(),
            })
            .collect(),
        form: form.clone(),
        submit_label: if editing {
            "Update Contact"
        } else {
            "Add Contact"
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{render_contacts, render_tasks, Emphasis};
    use crate::model::contact::{Contact, ContactForm};
    use crate::model::task::{Task, TaskId};

    fn sample_tasks() -> Vec<Task> {
        vec![
            Task::new(TaskId(1), "water plants", false),
            Task::new(TaskId(2), "pay rent", true),
            Task::new(TaskId(3), "call mom", true),
        ]
    }

    #[test]
    fn reminder_tasks_are_highlighted_with_disable_label() {
        let view = render_tasks(&sample_tasks(), false);
        assert_eq!(view.rows[0].emphasis, Emphasis::Muted);
        assert_eq!(view.rows[0].toggle_label, "Enable Reminder");
        assert_eq!(view.rows[1].emphasis, Emphasis::Highlighted);
        assert_eq!(view.rows[1].toggle_label, "Disable Reminder");
    }

    #[test]
    fn hidden_reminder_list_renders_nothing() {
        let view = render_tasks(&sample_tasks(), false);
        assert!(view.reminder_rows.is_none());
        assert_eq!(view.reminders_button_label, "Show Reminders");
    }

    #[test]
    fn shown_reminder_list_keeps_list_order() {
        let view = render_tasks(&sample_tasks(), true);
        let ids: Vec<_> = view
            .reminder_rows
            .expect("reminder rows should be rendered")
            .into_iter()
            .map(|row| row.id)
            .collect();
        assert_eq!(ids, vec![TaskId(2), TaskId(3)]);
        assert_eq!(view.reminders_button_label, "Hide Reminders");
    }

    #[test]
    fn submit_label_follows_edit_mode() {
        let contacts = vec![Contact::new("Ada", "ada@example.com", "555-0100")];
        let form = ContactForm::default();
        assert_eq!(
            render_contacts(&contacts, &form, false).submit_label,
            "Add Contact"
        );
        assert_eq!(
            render_contacts(&contacts, &form, true).submit_label,
            "Update Contact"
        );
    }
}
