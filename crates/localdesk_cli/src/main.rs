//! CLI driver for the local task and contact stores.
//!
//! # Responsibility
//! - Run one widget operation per invocation against a data directory.
//! - Keep output line-oriented and deterministic for scripting.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use localdesk_core::{
    default_log_level, init_logging, open_db_in_dir, ContactForm, ContactManager,
    SqliteContactRepository, SqliteTaskRepository, Task, TaskId, TaskIdPolicy, TaskManager,
    TaskManagerOptions, CONTACT_DB, TASK_DB,
};
use std::path::{Path, PathBuf};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "localdesk", version, about = "Local task and contact stores")]
struct Cli {
    /// Directory holding `taskDB.sqlite3` and `contactDB.sqlite3`.
    #[arg(long, env = "LOCALDESK_DATA_DIR", default_value_os_t = default_data_dir())]
    data_dir: PathBuf,

    /// Absolute directory for rolling log files; logging is off when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[arg(long, default_value_t = default_log_level().to_string())]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core linkage information.
    Ping,
    #[command(subcommand)]
    Task(TaskCommand),
    #[command(subcommand)]
    Contact(ContactCommand),
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    List,
    /// Show only tasks with a reminder set.
    Reminders,
    Add {
        title: String,
        #[arg(long)]
        reminder: bool,
        /// Assign `count + 1` instead of the store's auto-increment key.
        #[arg(long)]
        legacy_ids: bool,
    },
    Delete {
        id: i64,
    },
    /// Flip a task's reminder flag and write it through.
    Toggle {
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum ContactCommand {
    List,
    Add(ContactFields),
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: ContactFields,
    },
    Delete {
        id: Uuid,
    },
}

#[derive(Debug, Args)]
struct ContactFields {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
}

impl From<ContactFields> for ContactForm {
    fn from(fields: ContactFields) -> Self {
        ContactForm::new(fields.name, fields.email, fields.phone)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let log_dir = log_dir.to_string_lossy();
        init_logging(cli.log_level.as_str(), &log_dir)
            .context("failed to initialize logging")?;
    }

    match cli.command {
        Command::Ping => {
            println!("localdesk_core ping={}", localdesk_core::ping());
            println!("localdesk_core version={}", localdesk_core::core_version());
            Ok(())
        }
        Command::Task(command) => run_task(&cli.data_dir, command),
        Command::Contact(command) => run_contact(&cli.data_dir, command),
    }
}

fn run_task(data_dir: &Path, command: TaskCommand) -> Result<()> {
    let conn = open_db_in_dir(data_dir, &TASK_DB).context("failed to open taskDB")?;
    let repo = SqliteTaskRepository::try_new(&conn)?;
    let options = TaskManagerOptions {
        id_policy: match &command {
            TaskCommand::Add {
                legacy_ids: true, ..
            } => TaskIdPolicy::ListLengthPlusOne,
            _ => TaskIdPolicy::StoreAssigned,
        },
        persist_reminder_toggle: true,
    };
    let mut manager = TaskManager::with_options(repo, options);
    manager.load()?;

    match command {
        TaskCommand::List => manager.tasks().iter().for_each(print_task),
        TaskCommand::Reminders => manager.reminder_tasks().into_iter().for_each(print_task),
        TaskCommand::Add {
            title, reminder, ..
        } => {
            manager.set_title(title);
            manager.set_reminder(reminder);
            let task = manager.add_task()?;
            println!("added {}", task.id);
        }
        TaskCommand::Delete { id } => {
            manager.delete_task(TaskId(id))?;
            println!("deleted {id}");
        }
        TaskCommand::Toggle { id } => {
            let reminder = manager.toggle_reminder(TaskId(id))?;
            println!("task {id} reminder={reminder}");
        }
    }
    Ok(())
}

fn run_contact(data_dir: &Path, command: ContactCommand) -> Result<()> {
    let conn = open_db_in_dir(data_dir, &CONTACT_DB).context("failed to open contactDB")?;
    let repo = SqliteContactRepository::try_new(&conn)?;
    let mut manager = ContactManager::new(repo);
    manager.load()?;

    match command {
        ContactCommand::List => {
            for contact in manager.contacts() {
                println!(
                    "{}\t{}\t{}\t{}",
                    contact.id, contact.name, contact.email, contact.phone
                );
            }
        }
        ContactCommand::Add(fields) => {
            *manager.form_mut() = fields.into();
            let contact = manager.add_contact()?;
            println!("added {}", contact.id);
        }
        ContactCommand::Update { id, fields } => {
            manager.begin_edit(id)?;
            *manager.form_mut() = fields.into();
            let contact = manager.update_contact()?;
            println!("updated {}", contact.id);
        }
        ContactCommand::Delete { id } => {
            manager.delete_contact(id)?;
            println!("deleted {id}");
        }
    }
    Ok(())
}

fn print_task(task: &Task) {
    let marker = if task.reminder { "!" } else { " " };
    println!("{}\t{marker}\t{}", task.id, task.title);
}

fn default_data_dir() -> PathBuf {
    std::env::temp_dir().join("localdesk")
}
