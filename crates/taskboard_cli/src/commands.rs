//! Command dispatch.
//!
//! # Responsibility
//! - Resolve configuration, logging and storage for one invocation.
//! - Map each subcommand to one board service call and render its result.

use crate::cli::{
    Cli, Commands, CommentCommand, ProjectCommand, SectionCommand, TaskCommand, TaskPath,
};
use crate::error::{CliError, CliResult};
use crate::output;
use log::info;
use std::fmt::Write as _;
use std::path::Path;
use taskboard_core::db::open_db;
use taskboard_core::{
    init_logging, BoardConfig, BoardService, KeyValueStore, ProjectFilter, SqliteKeyValueStore,
    TaskDirection,
};

/// Runs one parsed invocation and returns the text to print.
pub fn run(cli: Cli) -> CliResult<String> {
    let config_path = cli.config.clone().unwrap_or_else(BoardConfig::default_path);
    let mut config = BoardConfig::load(&config_path)?;
    if let Some(db) = cli.db {
        config.database = db;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    if let Err(err) = init_logging(config.log_level, &config.log_dir) {
        eprintln!("warning: file logging disabled: {err}");
    }

    ensure_parent_dir(&config.database)?;
    let conn = open_db(&config.database)?;
    let store = SqliteKeyValueStore::try_new(&conn)?;
    let board = BoardService::with_author(&store, config.author.as_str());

    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&cli.command)
    );
    execute(&board, cli.command)
}

fn ensure_parent_dir(database: &Path) -> CliResult<()> {
    match database.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|source| CliError::CreateDataDir {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Project(_) => "project",
        Commands::Section(_) => "section",
        Commands::Task(_) => "task",
        Commands::Comment(_) => "comment",
    }
}

/// Applies `command` to `board`.
pub fn execute<S: KeyValueStore>(board: &BoardService<S>, command: Commands) -> CliResult<String> {
    match command {
        Commands::Project(command) => project(board, command),
        Commands::Section(command) => section(board, command),
        Commands::Task(command) => task(board, command),
        Commands::Comment(command) => comment(board, command),
    }
}

fn project<S: KeyValueStore>(board: &BoardService<S>, command: ProjectCommand) -> CliResult<String> {
    match command {
        ProjectCommand::Add { name } => {
            let project = board.create_project(&name)?;
            Ok(format!("created project {}\n", project.id))
        }
        ProjectCommand::List { search, today } => {
            let filter = ProjectFilter {
                search,
                today_only: today,
            };
            let projects = board.list_projects(&filter);
            if projects.is_empty() {
                return Ok("no projects\n".to_string());
            }
            let mut out = String::new();
            for project in &projects {
                let _ = writeln!(out, "{}", output::project_line(project));
            }
            Ok(out)
        }
        ProjectCommand::Show { project } => Ok(output::project_tree(&board.get_project(project)?)),
        ProjectCommand::Rename { project, name } => {
            let renamed = board.rename_project(project, &name)?;
            Ok(format!("renamed project {}\n", renamed.id))
        }
        ProjectCommand::Delete { project } => {
            board.delete_project(project)?;
            Ok(format!("deleted project {project}\n"))
        }
    }
}

fn section<S: KeyValueStore>(board: &BoardService<S>, command: SectionCommand) -> CliResult<String> {
    match command {
        SectionCommand::Add { project, name } => {
            let section = board.add_section(project, &name)?;
            Ok(format!("created section {}\n", section.id))
        }
        SectionCommand::Rename {
            project,
            section,
            name,
        } => {
            board.rename_section(project, section, &name)?;
            Ok(format!("renamed section {section}\n"))
        }
        SectionCommand::Delete { project, section } => {
            board.delete_section(project, section)?;
            Ok(format!("deleted section {section}\n"))
        }
    }
}

fn task<S: KeyValueStore>(board: &BoardService<S>, command: TaskCommand) -> CliResult<String> {
    match command {
        TaskCommand::Add {
            project,
            section,
            title,
        } => {
            let task = board.add_task(project, section, &title)?;
            Ok(format!("created task {}\n", task.id))
        }
        TaskCommand::Show(path) => {
            let task = board.get_task(path.project, path.section, path.task)?;
            let comments = board.list_comments(path.project, path.section, path.task)?;
            Ok(output::task_details(&task, &comments))
        }
        TaskCommand::Edit {
            path,
            title,
            description,
            due,
            priority,
            labels,
            clear_labels,
        } => {
            let mut task = board.get_task(path.project, path.section, path.task)?;
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(description) = description {
                task.description = Some(description);
            }
            if let Some(due) = due {
                task.due_date = due.0;
            }
            if let Some(priority) = priority {
                task.priority = Some(priority);
            }
            if clear_labels {
                task.labels.clear();
            } else if !labels.is_empty() {
                task.labels = labels;
            }
            let updated = board.update_task(path.project, path.section, task)?;
            Ok(format!("{}\n", output::task_line(&updated)))
        }
        TaskCommand::Delete(path) => {
            board.delete_task(path.project, path.section, path.task)?;
            Ok(format!("deleted task {}\n", path.task))
        }
        TaskCommand::Next(path) => neighbor(board, &path, TaskDirection::Next),
        TaskCommand::Prev(path) => neighbor(board, &path, TaskDirection::Previous),
    }
}

fn neighbor<S: KeyValueStore>(
    board: &BoardService<S>,
    path: &TaskPath,
    direction: TaskDirection,
) -> CliResult<String> {
    let adjacent = board.adjacent_task(path.project, path.section, path.task, direction)?;
    Ok(match adjacent {
        Some(task) => format!("{}\n", output::task_line(&task)),
        None => match direction {
            TaskDirection::Next => "no next task\n".to_string(),
            TaskDirection::Previous => "no previous task\n".to_string(),
        },
    })
}

fn comment<S: KeyValueStore>(board: &BoardService<S>, command: CommentCommand) -> CliResult<String> {
    match command {
        CommentCommand::Add {
            path,
            content,
            images,
        } => {
            let comment =
                board.add_comment(path.project, path.section, path.task, &content, images)?;
            Ok(format!("added comment {}\n", comment.id))
        }
        CommentCommand::List(path) => {
            let comments = board.list_comments(path.project, path.section, path.task)?;
            if comments.is_empty() {
                return Ok("no comments\n".to_string());
            }
            Ok(comments.iter().map(output::comment_block).collect())
        }
        CommentCommand::Prune => {
            let removed = board.prune_orphan_comments()?;
            Ok(format!("removed {removed} orphaned comment entries\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::execute;
    use crate::cli::Cli;
    use crate::error::CliError;
    use clap::Parser;
    use taskboard_core::{
        BoardError, BoardService, KeyValueStore, MemoryKeyValueStore, ProjectFilter, PROJECTS_KEY,
    };

    fn exec(board: &BoardService<&MemoryKeyValueStore>, args: &[&str]) -> Result<String, CliError> {
        let cli = Cli::try_parse_from(std::iter::once("taskboard").chain(args.iter().copied()))
            .unwrap();
        execute(board, cli.command)
    }

    #[test]
    fn project_section_task_flow() {
        let memory = MemoryKeyValueStore::new();
        let board = BoardService::new(&memory);

        exec(&board, &["project", "add", "Launch"]).unwrap();
        let project = board.list_projects(&ProjectFilter::default())[0].id.to_string();
        exec(&board, &["section", "add", &project, "Todo"]).unwrap();
        let section = board.list_projects(&ProjectFilter::default())[0].sessions[0]
            .id
            .to_string();
        exec(&board, &["task", "add", &project, &section, "Write copy"]).unwrap();

        let listing = exec(&board, &["project", "list"]).unwrap();
        assert!(listing.contains("Launch"));
        assert!(listing.contains("(1 sections)"));

        let tree = exec(&board, &["project", "show", &project]).unwrap();
        assert!(tree.contains("Write copy"));
    }

    #[test]
    fn task_edit_applies_only_given_flags() {
        let memory = MemoryKeyValueStore::new();
        let board = BoardService::new(&memory);
        let project = board.create_project("Launch").unwrap();
        let section = board.add_section(project.id, "Todo").unwrap();
        let task = board.add_task(project.id, section.id, "Write copy").unwrap();
        let (p, s, t) = (
            project.id.to_string(),
            section.id.to_string(),
            task.id.to_string(),
        );

        exec(
            &board,
            &["task", "edit", &p, &s, &t, "--priority", "high", "--label", "Docs", "--due", "2024-06-01"],
        )
        .unwrap();
        exec(&board, &["task", "edit", &p, &s, &t, "--due", ""]).unwrap();

        let stored = board.get_task(project.id, section.id, task.id).unwrap();
        assert_eq!(stored.title, "Write copy");
        assert_eq!(stored.priority.as_deref(), Some("high"));
        assert_eq!(stored.labels, vec!["docs"]);
        assert_eq!(stored.due_date, None);
    }

    #[test]
    fn blank_project_name_is_an_error_and_writes_nothing() {
        let memory = MemoryKeyValueStore::new();
        let board = BoardService::new(&memory);

        let err = exec(&board, &["project", "add", "   "]).unwrap_err();
        assert!(matches!(err, CliError::Board(BoardError::Validation(_))));
        assert_eq!(err.to_string(), "name must not be blank");
        assert!(memory.get_item(PROJECTS_KEY).unwrap().is_none());
    }

    #[test]
    fn navigation_reports_edges() {
        let memory = MemoryKeyValueStore::new();
        let board = BoardService::new(&memory);
        let project = board.create_project("Launch").unwrap();
        let section = board.add_section(project.id, "Todo").unwrap();
        let first = board.add_task(project.id, section.id, "one").unwrap();
        board.add_task(project.id, section.id, "two").unwrap();
        let (p, s, t) = (
            project.id.to_string(),
            section.id.to_string(),
            first.id.to_string(),
        );

        let next = exec(&board, &["task", "next", &p, &s, &t]).unwrap();
        assert!(next.contains("two"));
        let prev = exec(&board, &["task", "prev", &p, &s, &t]).unwrap();
        assert_eq!(prev, "no previous task\n");
    }

    #[test]
    fn comments_add_and_list() {
        let memory = MemoryKeyValueStore::new();
        let board = BoardService::with_author(&memory, "Ana");
        let project = board.create_project("Launch").unwrap();
        let section = board.add_section(project.id, "Todo").unwrap();
        let task = board.add_task(project.id, section.id, "one").unwrap();
        let (p, s, t) = (
            project.id.to_string(),
            section.id.to_string(),
            task.id.to_string(),
        );

        assert_eq!(
            exec(&board, &["comment", "list", &p, &s, &t]).unwrap(),
            "no comments\n"
        );
        exec(&board, &["comment", "add", &p, &s, &t, "ship it"]).unwrap();
        let listing = exec(&board, &["comment", "list", &p, &s, &t]).unwrap();
        assert!(listing.contains("Ana"));
        assert!(listing.contains("ship it"));

        assert_eq!(
            exec(&board, &["comment", "prune"]).unwrap(),
            "removed 0 orphaned comment entries\n"
        );
    }
}
