//! Per-task comment persistence.
//!
//! Each task's comments live under their own key,
//! `task_comments_<task id>`, as a JSON array.
//!
//! # Invariants
//! - A missing or unreadable entry is reported as absent, so callers can
//!   fall back to the comments embedded in the task.
//! - Write and remove failures are logged and swallowed.

use crate::model::id::EntityId;
use crate::model::task::Comment;
use crate::store::{KeyValueStore, StoreError, StoreResult};
use log::{debug, error, warn};
use std::collections::HashSet;

/// Key prefix shared by every per-task comment entry.
pub const COMMENTS_KEY_PREFIX: &str = "task_comments_";

/// Returns the storage key for one task's comments.
pub fn comments_key(task_id: EntityId) -> String {
    format!("{COMMENTS_KEY_PREFIX}{task_id}")
}

/// Key used by older snapshots, where task ids were plain numbers.
fn legacy_comments_key(task_id: EntityId) -> Option<String> {
    task_id
        .legacy_text()
        .map(|text| format!("{COMMENTS_KEY_PREFIX}{text}"))
}

pub struct CommentStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> CommentStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads one task's comments; `Ok(None)` when no entry exists.
    ///
    /// Tasks carrying a legacy numeric id are also looked up under the
    /// numeric key when the canonical key is absent.
    pub fn try_load(&self, task_id: EntityId) -> StoreResult<Option<Vec<Comment>>> {
        let mut key = comments_key(task_id);
        let mut raw = self.store.get_item(&key)?;
        if raw.is_none() {
            if let Some(legacy_key) = legacy_comments_key(task_id) {
                raw = self.store.get_item(&legacy_key)?;
                key = legacy_key;
            }
        }
        let Some(raw) = raw else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| StoreError::Corrupt(format!("`{key}` is invalid: {err}")))
    }

    /// Loads one task's comments; unreadable entries count as absent.
    pub fn load(&self, task_id: EntityId) -> Option<Vec<Comment>> {
        match self.try_load(task_id) {
            Ok(comments) => comments,
            Err(err) => {
                warn!(
                    "event=comments_load module=repo status=error task_id={task_id} fallback=embedded error={err}"
                );
                None
            }
        }
    }

    /// Overwrites one task's comment entry.
    pub fn save(&self, task_id: EntityId, comments: &[Comment]) {
        let result = serde_json::to_string(comments)
            .map_err(StoreError::Serialize)
            .and_then(|encoded| self.store.set_item(&comments_key(task_id), &encoded));
        match result {
            Ok(()) => debug!(
                "event=comments_save module=repo status=ok task_id={task_id} count={}",
                comments.len()
            ),
            Err(err) => error!(
                "event=comments_save module=repo status=error task_id={task_id} error={err}"
            ),
        }
    }

    /// Drops one task's comment entries (canonical and legacy), if any.
    pub fn remove(&self, task_id: EntityId) {
        let keys = std::iter::once(comments_key(task_id)).chain(legacy_comments_key(task_id));
        for key in keys {
            if let Err(err) = self.store.remove_item(&key) {
                error!(
                    "event=comments_remove module=repo status=error task_id={task_id} error={err}"
                );
            }
        }
    }

    /// Removes entries whose task id is not in `live_task_ids`.
    ///
    /// Entries with keys that do not parse as an id are removed as well.
    /// Returns the number of removed entries.
    pub fn prune(&self, live_task_ids: &HashSet<EntityId>) -> StoreResult<usize> {
        let mut removed = 0;
        for key in self.store.keys_with_prefix(COMMENTS_KEY_PREFIX)? {
            let suffix = &key[COMMENTS_KEY_PREFIX.len()..];
            let live = suffix
                .parse::<EntityId>()
                .map(|id| live_task_ids.contains(&id))
                .unwrap_or(false);
            if !live {
                self.store.remove_item(&key)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
