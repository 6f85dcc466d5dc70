//! Task and comment records.
//!
//! # Invariants
//! - `Task::id` is unique within its section.
//! - Comments keep insertion order; newest last.
//! - Empty optional fields are omitted from the serialized form.

use super::compat::{deserialize_optional_date, deserialize_timestamp};
use super::id::EntityId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single work item within a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_date"
    )]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
}

impl Task {
    /// Creates a task with a generated id and no metadata.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(EntityId::new(), title)
    }

    pub fn with_id(id: EntityId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            due_date: None,
            priority: None,
            labels: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// Returns a copy carrying `comments` in place of the current list.
    pub fn with_comments(&self, comments: Vec<Comment>) -> Self {
        Self {
            comments,
            ..self.clone()
        }
    }
}

/// A timestamped note attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: EntityId,
    pub author: String,
    #[serde(default)]
    pub content: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub date: DateTime<Utc>,
    /// Attachment URLs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

impl Comment {
    pub fn new(
        author: impl Into<String>,
        content: impl Into<String>,
        images: Vec<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EntityId::new(),
            author: author.into(),
            content: content.into(),
            date,
            images,
        }
    }

    /// Whether the comment carries neither text nor attachments.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty() && self.images.is_empty()
    }
}
