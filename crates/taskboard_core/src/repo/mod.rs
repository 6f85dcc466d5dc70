//! Store adapters between the board model and the key-value medium.
//!
//! # Responsibility
//! - Encode the project list and per-task comment lists as JSON documents.
//! - Absorb storage glitches: loads degrade to empty/absent, writes log.
//!
//! # Invariants
//! - The project list is always written whole; there are no partial updates.
//! - Fallible `try_*` variants exist for callers that must see the error.

pub mod comment_store;
pub mod project_store;
