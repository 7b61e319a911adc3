//! Domain model for scoped, ranked task lists.
//!
//! # Responsibility
//! - Define canonical records shared by repositories and services.
//! - Keep scope identity (`owner`, `project`) explicit in every record.
//!
//! # Invariants
//! - Task and project ids are store-assigned and never reused.
//! - A task belongs to exactly one scope at a time.

pub mod project;
pub mod scope;
pub mod task;
