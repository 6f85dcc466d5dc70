//! Project list persistence over a key-value medium.
//!
//! # Responsibility
//! - Read and write the whole project list as one JSON document.
//! - Degrade to an empty list when the stored document is missing or bad.
//!
//! # Invariants
//! - `list` never fails; `save` never fails. Both log what they swallow.
//! - A document is accepted only when every element carries `id`, `name`
//!   and `date`; otherwise the whole load is rejected.
//! - Log lines carry key names and counts only, never project content.

use crate::model::project::Project;
use crate::store::{KeyValueStore, StoreError, StoreResult};
use log::{debug, error, warn};
use serde_json::Value;

/// Storage key holding the serialized project list.
pub const PROJECTS_KEY: &str = "projects";

const REQUIRED_PROJECT_FIELDS: &[&str] = &["id", "name", "date"];

/// Store adapter for the project list.
pub struct ProjectStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> ProjectStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads all projects, surfacing storage and shape errors.
    pub fn try_list(&self) -> StoreResult<Vec<Project>> {
        let Some(raw) = self.store.get_item(PROJECTS_KEY)? else {
            return Ok(Vec::new());
        };

        let document: Value = serde_json::from_str(&raw)
            .map_err(|err| StoreError::Corrupt(format!("`{PROJECTS_KEY}` is not JSON: {err}")))?;
        check_project_shape(&document)?;

        serde_json::from_value(document)
            .map_err(|err| StoreError::Corrupt(format!("`{PROJECTS_KEY}` entry is invalid: {err}")))
    }

    /// Loads all projects; missing or unreadable data yields an empty list.
    pub fn list(&self) -> Vec<Project> {
        match self.try_list() {
            Ok(projects) => {
                debug!(
                    "event=store_load module=repo status=ok key={PROJECTS_KEY} count={}",
                    projects.len()
                );
                projects
            }
            Err(err) => {
                warn!(
                    "event=store_load module=repo status=error key={PROJECTS_KEY} fallback=empty error={err}"
                );
                Vec::new()
            }
        }
    }

    /// Serializes and overwrites the whole project list.
    pub fn try_save(&self, projects: &[Project]) -> StoreResult<()> {
        let encoded = serde_json::to_string(projects).map_err(StoreError::Serialize)?;
        self.store.set_item(PROJECTS_KEY, &encoded)
    }

    /// Serializes and overwrites the whole project list; failures are logged.
    pub fn save(&self, projects: &[Project]) {
        match self.try_save(projects) {
            Ok(()) => debug!(
                "event=store_save module=repo status=ok key={PROJECTS_KEY} count={}",
                projects.len()
            ),
            Err(err) => error!(
                "event=store_save module=repo status=error key={PROJECTS_KEY} count={} error={err}",
                projects.len()
            ),
        }
    }
}

fn check_project_shape(document: &Value) -> StoreResult<()> {
    let items = document
        .as_array()
        .ok_or_else(|| StoreError::Corrupt(format!("`{PROJECTS_KEY}` is not an array")))?;

    for (index, item) in items.iter().enumerate() {
        let missing = REQUIRED_PROJECT_FIELDS
            .iter()
            .find(|field| item.get(**field).is_none());
        if let Some(field) = missing {
            return Err(StoreError::Corrupt(format!(
                "`{PROJECTS_KEY}` entry {index} is missing `{field}`"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ProjectStore, PROJECTS_KEY};
    use crate::store::{KeyValueStore, MemoryKeyValueStore, StoreError};

    #[test]
    fn shape_check_rejects_whole_document() {
        let memory = MemoryKeyValueStore::new();
        memory
            .set_item(
                PROJECTS_KEY,
                r#"[{"id":1,"name":"ok","date":"2024-01-01"},{"id":2,"name":"no date"}]"#,
            )
            .unwrap();
        let store = ProjectStore::new(&memory);

        let err = store.try_list().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(message) if message.contains("`date`")));
        assert!(store.list().is_empty());
    }

    #[test]
    fn non_array_document_is_corrupt() {
        let memory = MemoryKeyValueStore::new();
        memory.set_item(PROJECTS_KEY, r#"{"id":1}"#).unwrap();
        let store = ProjectStore::new(&memory);

        assert!(matches!(store.try_list(), Err(StoreError::Corrupt(_))));
    }
}
