//! Board domain model.
//!
//! # Responsibility
//! - Define the Project → Section → Task → Comment tree.
//! - Keep mutation helpers copy-on-write so callers replace whole values.
//!
//! # Invariants
//! - Every entity is identified by an `EntityId`.
//! - Deletion is list filtering; there are no tombstones.

mod compat;
pub mod id;
pub mod project;
pub mod task;
pub mod validation;
