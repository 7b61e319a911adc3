//! Task domain model.
//!
//! # Responsibility
//! - Define the ranked task record and its caller-facing inputs.
//! - Validate record-level invariants before persistence.
//!
//! # Invariants
//! - `id` is assigned by the store on creation and never reused.
//! - `priority_rank` and `position` are one-based when present.
//! - `title` is never blank.
//!
//! # See also
//! - crates/taskrank_core/src/rank/mod.rs

use crate::model::scope::{OwnerId, ProjectId, ScopeKey};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned task identifier. Ascending ids follow creation order.
pub type TaskId = i64;

/// Default status label for newly created tasks.
pub const DEFAULT_TASK_STATUS: &str = "todo";

/// Canonical persisted task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub owner: OwnerId,
    /// `None` means the owner's unscoped list.
    pub project: Option<ProjectId>,
    pub title: String,
    pub description: String,
    /// Free-form label; the engine never interprets it.
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub is_important: bool,
    /// Explicit rank `1..=K`, absent for unranked tasks.
    pub priority_rank: Option<u32>,
    /// Dense sequence index from the last reorder that listed this task.
    pub position: Option<u32>,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

impl Task {
    /// Scope this task currently belongs to.
    pub fn scope(&self) -> ScopeKey {
        ScopeKey {
            owner: self.owner,
            project: self.project,
        }
    }

    pub fn belongs_to(&self, scope: &ScopeKey) -> bool {
        self.owner == scope.owner && self.project == scope.project
    }

    /// Validates record-level invariants.
    ///
    /// Rank vs. rank-slot limit is a scope-level rule and is enforced by
    /// the ranking engine, not here.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_title(&self.title)?;
        if self.priority_rank == Some(0) {
            return Err(TaskValidationError::ZeroPriorityRank);
        }
        if self.position == Some(0) {
            return Err(TaskValidationError::ZeroPosition);
        }
        Ok(())
    }
}

/// Caller input for creating a task in a scope.
///
/// `is_important` is accepted for wire compatibility but creation always
/// stores `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub is_important: bool,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Full replacement of the user-editable task fields.
///
/// Rank, position and scope are not part of an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    pub title: String,
    pub description: String,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub is_important: bool,
}

/// Insert payload handed to the store; the store assigns `id` and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub scope: ScopeKey,
    pub title: String,
    pub description: String,
    pub status: String,
    pub due_date: Option<NaiveDate>,
    pub is_important: bool,
}

impl NewTask {
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_title(&self.title)
    }
}

/// Record-level validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty after trimming.
    BlankTitle,
    /// Ranks are one-based.
    ZeroPriorityRank,
    /// Positions are one-based.
    ZeroPosition,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "task title must not be blank"),
            Self::ZeroPriorityRank => write!(f, "task priority rank must be >= 1"),
            Self::ZeroPosition => write!(f, "task position must be >= 1"),
        }
    }
}

impl Error for TaskValidationError {}

fn validate_title(title: &str) -> Result<(), TaskValidationError> {
    if title.trim().is_empty() {
        return Err(TaskValidationError::BlankTitle);
    }
    Ok(())
}
