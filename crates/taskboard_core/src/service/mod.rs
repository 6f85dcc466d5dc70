//! Board use-case services.
//!
//! # Responsibility
//! - Turn user actions into whole-list mutations of the project tree.
//! - Keep front ends decoupled from storage keys and document shapes.

pub mod board_service;
