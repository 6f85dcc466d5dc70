use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use taskboard_core::{EntityId, LogLevel};

/// Command-line interface for Taskboard
/// Projects, sections, tasks and comments persisted in one SQLite file
#[derive(Debug, Parser)]
#[command(
    name = "taskboard",
    version = env!("CARGO_PKG_VERSION"),
    about = "A small project board: projects hold sections, sections hold tasks",
    long_about = None
)]
pub struct Cli {
    /// Override database path
    #[arg(global = true, long = "db")]
    pub db: Option<PathBuf>,

    /// Config file to read instead of the default location
    #[arg(global = true, long = "config")]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error)
    #[arg(global = true, long = "log-level")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create, list and manage projects
    #[command(subcommand)]
    Project(ProjectCommand),

    /// Manage sections inside a project
    #[command(subcommand)]
    Section(SectionCommand),

    /// Manage tasks inside a section
    #[command(subcommand)]
    Task(TaskCommand),

    /// Read and write task comments
    #[command(subcommand)]
    Comment(CommentCommand),
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// Create a project dated today
    Add { name: String },

    /// List projects in stored order
    List {
        #[arg(long = "search", help = "Case-insensitive name filter")]
        search: Option<String>,

        #[arg(long = "today", help = "Only projects created today")]
        today: bool,
    },

    /// Print a project with its sections and tasks
    Show { project: EntityId },

    Rename { project: EntityId, name: String },

    Delete { project: EntityId },
}

#[derive(Debug, Subcommand)]
pub enum SectionCommand {
    /// Append a section to a project
    Add { project: EntityId, name: String },

    Rename {
        project: EntityId,
        section: EntityId,
        name: String,
    },

    /// Delete a section and its tasks
    Delete { project: EntityId, section: EntityId },
}

/// Addresses one task.
#[derive(Debug, Clone, clap::Args)]
pub struct TaskPath {
    pub project: EntityId,
    pub section: EntityId,
    pub task: EntityId,
}

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// Append a task to a section
    Add {
        project: EntityId,
        section: EntityId,
        title: String,
    },

    /// Print task details and comments
    Show(TaskPath),

    /// Change task fields; only given flags are applied
    Edit {
        #[command(flatten)]
        path: TaskPath,

        #[arg(long = "title")]
        title: Option<String>,

        #[arg(long = "description", help = "Task description (empty clears it)")]
        description: Option<String>,

        #[arg(
            long = "due",
            value_parser = parse_due_date,
            help = "Due date YYYY-MM-DD (empty clears it)"
        )]
        due: Option<DueDate>,

        #[arg(long = "priority", help = "Priority label (empty clears it)")]
        priority: Option<String>,

        #[arg(long = "label", help = "Label; repeat to set several")]
        labels: Vec<String>,

        #[arg(long = "clear-labels", conflicts_with = "labels")]
        clear_labels: bool,
    },

    Delete(TaskPath),

    /// Print the next task in the same section
    Next(TaskPath),

    /// Print the previous task in the same section
    Prev(TaskPath),
}

#[derive(Debug, Subcommand)]
pub enum CommentCommand {
    /// Add a comment by the configured author
    Add {
        #[command(flatten)]
        path: TaskPath,

        #[arg(default_value = "")]
        content: String,

        #[arg(long = "image", help = "Attachment URL; repeat for several")]
        images: Vec<String>,
    },

    List(TaskPath),

    /// Remove comment entries whose task no longer exists
    Prune,
}

/// `--due` value; `None` clears the due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueDate(pub Option<NaiveDate>);

fn parse_due_date(value: &str) -> Result<DueDate, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(DueDate(None));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| DueDate(Some(date)))
        .map_err(|_| format!("invalid date `{trimmed}`, expected YYYY-MM-DD"))
}
