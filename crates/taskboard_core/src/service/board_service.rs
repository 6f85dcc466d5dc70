//! Board use-case service.
//!
//! # Responsibility
//! - Apply project, section, task and comment mutations to the full project
//!   list and persist the result as one snapshot.
//! - Reject blank names before any storage access.
//!
//! # Invariants
//! - Every mutation is load → copy with change → replace → save whole list.
//! - A rejected mutation leaves stored data byte-for-byte unchanged.
//! - Writes start from `try_list`: an unreadable medium aborts the write,
//!   only a corrupt document is replaced.
//! - There is no version check: concurrent writers overwrite each other.

use crate::model::id::EntityId;
use crate::model::project::{Project, Section, TaskDirection};
use crate::model::task::{Comment, Task};
use crate::model::validation::{
    normalize_labels, normalize_name, normalize_title, ModelValidationError,
};
use crate::repo::comment_store::CommentStore;
use crate::repo::project_store::{ProjectStore, PROJECTS_KEY};
use crate::store::{KeyValueStore, StoreError};
use chrono::{Local, NaiveDate, Utc};
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Author recorded on comments when none is configured.
pub const DEFAULT_AUTHOR: &str = "Current User";

pub type BoardResult<T> = Result<T, BoardError>;

/// Errors from board service operations.
#[derive(Debug)]
pub enum BoardError {
    /// User input rejected; nothing was written.
    Validation(ModelValidationError),
    ProjectNotFound(EntityId),
    SectionNotFound(EntityId),
    TaskNotFound(EntityId),
    /// Storage failure on a path that does not swallow errors.
    Store(StoreError),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::SectionNotFound(id) => write!(f, "section not found: {id}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelValidationError> for BoardError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for BoardError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Listing filter for projects.
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    /// Case-insensitive substring matched against the project name.
    pub search: Option<String>,
    /// Keep only projects created today.
    pub today_only: bool,
}

impl ProjectFilter {
    pub fn matches(&self, project: &Project, today: NaiveDate) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => project
                .name
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        };
        let matches_today = !self.today_only || project.date == today;
        matches_search && matches_today
    }
}

/// Board service facade over a key-value medium.
pub struct BoardService<S: KeyValueStore> {
    store: S,
    author: String,
}

impl<S: KeyValueStore> BoardService<S> {
    /// Creates a service recording comments as [`DEFAULT_AUTHOR`].
    pub fn new(store: S) -> Self {
        Self::with_author(store, DEFAULT_AUTHOR)
    }

    pub fn with_author(store: S, author: impl Into<String>) -> Self {
        Self {
            store,
            author: author.into(),
        }
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    fn projects(&self) -> ProjectStore<&S> {
        ProjectStore::new(&self.store)
    }

    fn comments(&self) -> CommentStore<&S> {
        CommentStore::new(&self.store)
    }

    /// Creates a project dated today with no sections.
    pub fn create_project(&self, name: &str) -> BoardResult<Project> {
        let name = normalize_name(name)?;
        let project = Project::new(name, today());

        let mut projects = self.load_for_write()?;
        projects.push(project.clone());
        self.projects().save(&projects);

        info!(
            "event=project_create module=service status=ok project_id={} total={}",
            project.id,
            projects.len()
        );
        Ok(project)
    }

    /// Lists stored projects in stored order, keeping those matching `filter`.
    pub fn list_projects(&self, filter: &ProjectFilter) -> Vec<Project> {
        let today = today();
        self.projects()
            .list()
            .into_iter()
            .filter(|project| filter.matches(project, today))
            .collect()
    }

    pub fn get_project(&self, project_id: EntityId) -> BoardResult<Project> {
        self.projects()
            .list()
            .into_iter()
            .find(|project| project.id == project_id)
            .ok_or(BoardError::ProjectNotFound(project_id))
    }

    pub fn rename_project(&self, project_id: EntityId, name: &str) -> BoardResult<Project> {
        let name = normalize_name(name)?;
        let updated = self.update_project(project_id, |project| Ok(project.renamed(name)))?;
        info!("event=project_rename module=service status=ok project_id={project_id}");
        Ok(updated)
    }

    /// Removes the project and the comment entries of all its tasks.
    pub fn delete_project(&self, project_id: EntityId) -> BoardResult<()> {
        let projects = self.load_for_write()?;
        let removed = projects
            .iter()
            .find(|project| project.id == project_id)
            .ok_or(BoardError::ProjectNotFound(project_id))?;

        for task_id in removed.task_ids() {
            self.comments().remove(task_id);
        }

        let remaining: Vec<Project> = projects
            .iter()
            .filter(|project| project.id != project_id)
            .cloned()
            .collect();
        self.projects().save(&remaining);

        info!(
            "event=project_delete module=service status=ok project_id={project_id} total={}",
            remaining.len()
        );
        Ok(())
    }

    /// Appends a new empty section to the project.
    pub fn add_section(&self, project_id: EntityId, name: &str) -> BoardResult<Section> {
        let section = Section::new(normalize_name(name)?);
        self.update_project(project_id, |project| {
            Ok(project.with_section(section.clone()))
        })?;
        info!(
            "event=section_add module=service status=ok project_id={project_id} section_id={}",
            section.id
        );
        Ok(section)
    }

    pub fn rename_section(
        &self,
        project_id: EntityId,
        section_id: EntityId,
        name: &str,
    ) -> BoardResult<Section> {
        let name = normalize_name(name)?;
        let updated = self.update_section(project_id, section_id, |section| {
            Ok(section.renamed(name))
        })?;
        info!(
            "event=section_rename module=service status=ok project_id={project_id} section_id={section_id}"
        );
        Ok(updated)
    }

    /// Removes exactly one section; siblings keep their order and content.
    pub fn delete_section(&self, project_id: EntityId, section_id: EntityId) -> BoardResult<()> {
        let mut removed_tasks = Vec::new();
        self.update_project(project_id, |project| {
            let section = project
                .section(section_id)
                .ok_or(BoardError::SectionNotFound(section_id))?;
            removed_tasks.extend(section.tasks.iter().map(|task| task.id));
            project
                .without_section(section_id)
                .ok_or(BoardError::SectionNotFound(section_id))
        })?;

        for task_id in removed_tasks {
            self.comments().remove(task_id);
        }
        info!(
            "event=section_delete module=service status=ok project_id={project_id} section_id={section_id}"
        );
        Ok(())
    }

    /// Appends a task with the given title to the section.
    pub fn add_task(
        &self,
        project_id: EntityId,
        section_id: EntityId,
        title: &str,
    ) -> BoardResult<Task> {
        let task = Task::new(normalize_title(title)?);
        self.update_section(project_id, section_id, |section| {
            Ok(section.with_task(task.clone()))
        })?;
        info!(
            "event=task_add module=service status=ok project_id={project_id} section_id={section_id} task_id={}",
            task.id
        );
        Ok(task)
    }

    pub fn get_task(
        &self,
        project_id: EntityId,
        section_id: EntityId,
        task_id: EntityId,
    ) -> BoardResult<Task> {
        let project = self.get_project(project_id)?;
        let section = project
            .section(section_id)
            .ok_or(BoardError::SectionNotFound(section_id))?;
        section
            .task(task_id)
            .cloned()
            .ok_or(BoardError::TaskNotFound(task_id))
    }

    /// Replaces the stored task carrying `task.id` with `task`.
    ///
    /// The title is trimmed and must not be blank; labels are normalized.
    /// Blank descriptions and priorities are stored as absent.
    pub fn update_task(
        &self,
        project_id: EntityId,
        section_id: EntityId,
        task: Task,
    ) -> BoardResult<Task> {
        let task = Task {
            title: normalize_title(&task.title)?,
            description: non_blank(task.description),
            priority: non_blank(task.priority),
            labels: normalize_labels(&task.labels),
            ..task
        };
        let task_id = task.id;
        self.update_section(project_id, section_id, |section| {
            section
                .replace_task(task.clone())
                .ok_or(BoardError::TaskNotFound(task_id))
        })?;
        info!(
            "event=task_update module=service status=ok project_id={project_id} section_id={section_id} task_id={task_id}"
        );
        Ok(task)
    }

    pub fn delete_task(
        &self,
        project_id: EntityId,
        section_id: EntityId,
        task_id: EntityId,
    ) -> BoardResult<()> {
        self.update_section(project_id, section_id, |section| {
            section
                .without_task(task_id)
                .ok_or(BoardError::TaskNotFound(task_id))
        })?;
        self.comments().remove(task_id);
        info!(
            "event=task_delete module=service status=ok project_id={project_id} section_id={section_id} task_id={task_id}"
        );
        Ok(())
    }

    /// Returns the previous or next task in the same section, `None` at the
    /// edges.
    pub fn adjacent_task(
        &self,
        project_id: EntityId,
        section_id: EntityId,
        task_id: EntityId,
        direction: TaskDirection,
    ) -> BoardResult<Option<Task>> {
        let project = self.get_project(project_id)?;
        let section = project
            .section(section_id)
            .ok_or(BoardError::SectionNotFound(section_id))?;
        section
            .task(task_id)
            .ok_or(BoardError::TaskNotFound(task_id))?;
        Ok(section.adjacent_task(task_id, direction).cloned())
    }

    /// Comments for a task: the per-task entry when present, otherwise the
    /// comments embedded in the task.
    pub fn list_comments(
        &self,
        project_id: EntityId,
        section_id: EntityId,
        task_id: EntityId,
    ) -> BoardResult<Vec<Comment>> {
        let task = self.get_task(project_id, section_id, task_id)?;
        Ok(self.comments().load(task_id).unwrap_or(task.comments))
    }

    /// Appends a comment by the configured author, timestamped now.
    ///
    /// The new list is written to the task's comment entry and embedded in
    /// the task through a full snapshot save.
    pub fn add_comment(
        &self,
        project_id: EntityId,
        section_id: EntityId,
        task_id: EntityId,
        content: &str,
        images: Vec<String>,
    ) -> BoardResult<Comment> {
        let images: Vec<String> = images
            .into_iter()
            .map(|image| image.trim().to_string())
            .filter(|image| !image.is_empty())
            .collect();
        let comment = Comment::new(self.author.as_str(), content.trim(), images, Utc::now());
        if comment.is_empty() {
            return Err(ModelValidationError::EmptyComment.into());
        }

        let mut comments = self.list_comments(project_id, section_id, task_id)?;
        comments.push(comment.clone());

        self.update_section(project_id, section_id, |section| {
            let task = section
                .task(task_id)
                .ok_or(BoardError::TaskNotFound(task_id))?;
            section
                .replace_task(task.with_comments(comments.clone()))
                .ok_or(BoardError::TaskNotFound(task_id))
        })?;
        self.comments().save(task_id, &comments);

        info!(
            "event=comment_add module=service status=ok task_id={task_id} comment_id={} count={}",
            comment.id,
            comments.len()
        );
        Ok(comment)
    }

    /// Removes comment entries whose task no longer exists.
    ///
    /// Fails without removing anything when the project list cannot be read
    /// or is corrupt.
    pub fn prune_orphan_comments(&self) -> BoardResult<usize> {
        let live: HashSet<EntityId> = self
            .projects()
            .try_list()?
            .iter()
            .flat_map(|project| project.task_ids().collect::<Vec<_>>())
            .collect();
        let removed = self.comments().prune(&live)?;
        info!("event=comments_prune module=service status=ok removed={removed}");
        Ok(removed)
    }

    /// Loads the list, swaps in `change(project)` for the target project and
    /// saves the whole list.
    fn update_project<F>(&self, project_id: EntityId, change: F) -> BoardResult<Project>
    where
        F: FnOnce(&Project) -> BoardResult<Project>,
    {
        let projects = self.load_for_write()?;
        let current = projects
            .iter()
            .find(|project| project.id == project_id)
            .ok_or(BoardError::ProjectNotFound(project_id))?;
        let updated = change(current)?;

        let replaced: Vec<Project> = projects
            .iter()
            .map(|project| {
                if project.id == project_id {
                    updated.clone()
                } else {
                    project.clone()
                }
            })
            .collect();
        self.projects().save(&replaced);
        Ok(updated)
    }

    /// Loads the project list as the base of a write.
    ///
    /// A corrupt document reads as empty, like [`ProjectStore::list`]. Any
    /// other storage failure is returned so the write never replaces data it
    /// could not read.
    fn load_for_write(&self) -> BoardResult<Vec<Project>> {
        match self.projects().try_list() {
            Ok(projects) => Ok(projects),
            Err(StoreError::Corrupt(reason)) => {
                warn!(
                    "event=store_load module=service status=error key={PROJECTS_KEY} fallback=empty error={reason}"
                );
                Ok(Vec::new())
            }
            Err(err) => {
                warn!(
                    "event=store_load module=service status=error key={PROJECTS_KEY} fallback=abort error={err}"
                );
                Err(err.into())
            }
        }
    }

    fn update_section<F>(
        &self,
        project_id: EntityId,
        section_id: EntityId,
        change: F,
    ) -> BoardResult<Section>
    where
        F: FnOnce(&Section) -> BoardResult<Section>,
    {
        let mut updated_section = None;
        self.update_project(project_id, |project| {
            let section = project
                .section(section_id)
                .ok_or(BoardError::SectionNotFound(section_id))?;
            let updated = change(section)?;
            updated_section = Some(updated.clone());
            project
                .replace_section(updated)
                .ok_or(BoardError::SectionNotFound(section_id))
        })?;
        updated_section.ok_or(BoardError::SectionNotFound(section_id))
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
