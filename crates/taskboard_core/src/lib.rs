//! Core domain logic for Taskboard.
//! Projects hold sections, sections hold tasks, tasks hold comments; the
//! whole tree is persisted as one document in a key-value medium.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{BoardConfig, ConfigError};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::id::{EntityId, ParseEntityIdError};
pub use model::project::{Project, Section, TaskDirection};
pub use model::task::{Comment, Task};
pub use model::validation::ModelValidationError;
pub use repo::comment_store::{comments_key, CommentStore, COMMENTS_KEY_PREFIX};
pub use repo::project_store::{ProjectStore, PROJECTS_KEY};
pub use service::board_service::{
    BoardError, BoardResult, BoardService, ProjectFilter, DEFAULT_AUTHOR,
};
pub use store::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
