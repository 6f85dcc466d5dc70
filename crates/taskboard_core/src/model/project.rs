//! Project and section aggregates.
//!
//! # Responsibility
//! - Define the Project → Section → Task tree persisted as one snapshot.
//! - Provide copy-on-write helpers: every helper returns a new value and
//!   leaves the receiver untouched.
//! - Accept snapshot shapes written by earlier board versions.
//!
//! # Invariants
//! - Section order and task order are user-visible and preserved.
//! - Helpers addressing a child by id return `None` when it is absent.

use super::compat::deserialize_date;
use super::id::EntityId;
use super::task::Task;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Top-level user-created container (a board).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProjectRecord")]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    /// Creation day, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Sections ("sessions") in display order.
    pub sessions: Vec<Section>,
}

/// A column of tasks within a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Navigation direction between sibling tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskDirection {
    Previous,
    Next,
}

impl Project {
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            date,
            sessions: Vec::new(),
        }
    }

    pub fn section(&self, section_id: EntityId) -> Option<&Section> {
        self.sessions.iter().find(|section| section.id == section_id)
    }

    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Returns a copy with `section` appended.
    pub fn with_section(&self, section: Section) -> Self {
        let mut sessions = self.sessions.clone();
        sessions.push(section);
        Self {
            sessions,
            ..self.clone()
        }
    }

    /// Returns a copy where the section with the same id is replaced.
    pub fn replace_section(&self, section: Section) -> Option<Self> {
        let position = self.sessions.iter().position(|s| s.id == section.id)?;
        let mut sessions = self.sessions.clone();
        sessions[position] = section;
        Some(Self {
            sessions,
            ..self.clone()
        })
    }

    /// Returns a copy without the section `section_id`.
    pub fn without_section(&self, section_id: EntityId) -> Option<Self> {
        self.section(section_id)?;
        Some(Self {
            sessions: self
                .sessions
                .iter()
                .filter(|section| section.id != section_id)
                .cloned()
                .collect(),
            ..self.clone()
        })
    }

    /// Iterates every task id held by this project.
    pub fn task_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.sessions
            .iter()
            .flat_map(|section| section.tasks.iter().map(|task| task.id))
    }
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn task(&self, task_id: EntityId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    pub fn with_task(&self, task: Task) -> Self {
        let mut tasks = self.tasks.clone();
        tasks.push(task);
        Self {
            tasks,
            ..self.clone()
        }
    }

    pub fn replace_task(&self, task: Task) -> Option<Self> {
        let position = self.tasks.iter().position(|t| t.id == task.id)?;
        let mut tasks = self.tasks.clone();
        tasks[position] = task;
        Some(Self {
            tasks,
            ..self.clone()
        })
    }

    pub fn without_task(&self, task_id: EntityId) -> Option<Self> {
        self.task(task_id)?;
        Some(Self {
            tasks: self
                .tasks
                .iter()
                .filter(|task| task.id != task_id)
                .cloned()
                .collect(),
            ..self.clone()
        })
    }

    /// Returns the sibling before or after `task_id`, `None` at either edge
    /// or when `task_id` is not in this section.
    pub fn adjacent_task(&self, task_id: EntityId, direction: TaskDirection) -> Option<&Task> {
        let position = self.tasks.iter().position(|task| task.id == task_id)?;
        match direction {
            TaskDirection::Previous => position.checked_sub(1).and_then(|i| self.tasks.get(i)),
            TaskDirection::Next => self.tasks.get(position + 1),
        }
    }
}

/// Stored project shape, including older variants.
#[derive(Deserialize)]
struct ProjectRecord {
    id: EntityId,
    name: String,
    #[serde(deserialize_with = "deserialize_date")]
    date: NaiveDate,
    #[serde(default, alias = "session")]
    sessions: Option<Vec<SectionRecord>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SectionRecord {
    Name(String),
    Full {
        #[serde(default)]
        id: Option<EntityId>,
        name: String,
        #[serde(default)]
        tasks: Option<Vec<TaskRecord>>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TaskRecord {
    Title(String),
    Full(Task),
}

impl From<ProjectRecord> for Project {
    fn from(record: ProjectRecord) -> Self {
        let project_id = record.id;
        let sessions = record
            .sessions
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, section)| section_from_record(project_id, index, section))
            .collect();

        Self {
            id: project_id,
            name: record.name,
            date: record.date,
            sessions,
        }
    }
}

fn section_from_record(project_id: EntityId, index: usize, record: SectionRecord) -> Section {
    match record {
        SectionRecord::Name(name) => Section {
            id: EntityId::derive(project_id, "section", index, &name),
            name,
            tasks: Vec::new(),
        },
        SectionRecord::Full { id, name, tasks } => {
            let section_id = id.unwrap_or_else(|| EntityId::derive(project_id, "section", index, &name));
            let tasks = tasks
                .unwrap_or_default()
                .into_iter()
                .enumerate()
                .map(|(task_index, task)| match task {
                    TaskRecord::Full(task) => task,
                    TaskRecord::Title(title) => Task::with_id(
                        EntityId::derive(section_id, "task", task_index, &title),
                        title,
                    ),
                })
                .collect();
            Section {
                id: section_id,
                name,
                tasks,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project() -> Project {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        Project::new("Launch", day)
            .with_section(Section::new("Todo").with_task(Task::new("a")).with_task(Task::new("b")))
            .with_section(Section::new("Done"))
    }

    #[test]
    fn copy_helpers_leave_receiver_untouched() {
        let project = sample_project();
        let todo = project.sessions[0].id;

        let trimmed = project.without_section(todo).unwrap();
        assert_eq!(project.sessions.len(), 2);
        assert_eq!(trimmed.sessions.len(), 1);
        assert_eq!(trimmed.sessions[0].name, "Done");
        assert!(project.without_section(EntityId::new()).is_none());
    }

    #[test]
    fn adjacent_task_stops_at_edges() {
        let project = sample_project();
        let section = &project.sessions[0];
        let first = section.tasks[0].id;
        let second = section.tasks[1].id;

        assert_eq!(
            section.adjacent_task(first, TaskDirection::Next).map(|t| t.id),
            Some(second)
        );
        assert!(section.adjacent_task(first, TaskDirection::Previous).is_none());
        assert!(section.adjacent_task(second, TaskDirection::Next).is_none());
    }

    #[test]
    fn legacy_project_shapes_are_accepted() {
        let raw = r#"{
            "id": 1,
            "name": "Old board",
            "date": "2024-01-15",
            "session": ["Backlog", {"id": 1717000000000, "name": "Doing", "tasks": ["write copy"]}]
        }"#;

        let project: Project = serde_json::from_str(raw).unwrap();
        assert_eq!(project.id, EntityId::from_legacy_integer(1));
        assert_eq!(project.sessions.len(), 2);
        assert_eq!(project.sessions[0].name, "Backlog");
        assert!(project.sessions[0].tasks.is_empty());
        assert_eq!(project.sessions[1].tasks[0].title, "write copy");

        let again: Project = serde_json::from_str(raw).unwrap();
        assert_eq!(again, project);
    }

    #[test]
    fn serialized_shape_uses_sessions_key() {
        let project = sample_project();
        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["date"], "2024-05-01");
        assert!(value["sessions"].is_array());
        assert!(value.get("session").is_none());
    }
}
