//! Plain-text rendering of board entities.

use std::fmt::Write as _;
use taskboard_core::{Comment, Project, Task};

pub fn project_line(project: &Project) -> String {
    format!(
        "{}  {}  {}  ({} sections)",
        project.id,
        project.date,
        project.name,
        project.sessions.len()
    )
}

/// Project header followed by each section and its tasks, indented.
pub fn project_tree(project: &Project) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  {}  {}", project.id, project.date, project.name);
    for section in &project.sessions {
        let _ = writeln!(out, "  [{}] {}", section.id, section.name);
        for task in &section.tasks {
            let _ = writeln!(out, "    - {}", task_line(task));
        }
    }
    out
}

pub fn task_line(task: &Task) -> String {
    let mut line = format!("{}  {}", task.id, task.title);
    if let Some(priority) = &task.priority {
        let _ = write!(line, "  !{priority}");
    }
    if let Some(due) = task.due_date {
        let _ = write!(line, "  due {due}");
    }
    if !task.labels.is_empty() {
        let _ = write!(line, "  #{}", task.labels.join(" #"));
    }
    line
}

pub fn task_details(task: &Task, comments: &[Comment]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "id:          {}", task.id);
    let _ = writeln!(out, "title:       {}", task.title);
    if let Some(description) = &task.description {
        let _ = writeln!(out, "description: {description}");
    }
    if let Some(due) = task.due_date {
        let _ = writeln!(out, "due:         {due}");
    }
    if let Some(priority) = &task.priority {
        let _ = writeln!(out, "priority:    {priority}");
    }
    if !task.labels.is_empty() {
        let _ = writeln!(out, "labels:      {}", task.labels.join(", "));
    }
    let _ = writeln!(out, "comments:    {}", comments.len());
    for comment in comments {
        out.push_str(&comment_block(comment));
    }
    out
}

pub fn comment_block(comment: &Comment) -> String {
    let mut out = format!(
        "  {} {} ({})\n",
        comment.date.format("%Y-%m-%d %H:%M"),
        comment.author,
        comment.id
    );
    if !comment.content.is_empty() {
        for line in comment.content.lines() {
            let _ = writeln!(out, "    {line}");
        }
    }
    for image in &comment.images {
        let _ = writeln!(out, "    [image] {image}");
    }
    out
}
