//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into ranked-list use-cases.
//! - Translate storage errors into the caller-facing taxonomy.
//!
//! # Invariants
//! - Missing and foreign resources both surface as not-found.
//! - Validation failures are detected before the first write.

pub mod project_service;
pub mod rank_service;
pub mod task_service;

use serde::Serialize;

/// Caller-facing error category shared by all services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Resource absent or outside the caller's scope.
    NotFound,
    /// Request shape or content rejected before any write.
    Validation,
    /// Request collides with existing state.
    Conflict,
    /// Store failure or corrupt persisted data.
    Storage,
}
