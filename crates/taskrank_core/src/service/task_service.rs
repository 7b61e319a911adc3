//! Task use-case service: scoped creation, reads, updates and queries.
//!
//! # Responsibility
//! - Create tasks with the forced defaults of a fresh list entry.
//! - Serve scope listings and importance/due-date queries.
//!
//! # Invariants
//! - New tasks start unimportant, unranked and unpositioned.
//! - Updates never touch rank, position or scope.
//! - Scope is trusted; ownership is checked by `ProjectService::resolve_scope`.

use crate::model::scope::{OwnerId, ScopeKey};
use crate::model::task::{
    NewTask, Task, TaskDraft, TaskId, TaskUpdate, TaskValidationError, DEFAULT_TASK_STATUS,
};
use crate::rank::{filter_and_sort, ImportanceFilter, SortDirection};
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoError;
use crate::service::ErrorKind;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from task and ranking use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Task does not exist or lives in another scope.
    TaskNotFound(TaskId),
    /// Reorder references a task that is not in the target scope.
    TaskOutsideScope { task_id: TaskId, scope: ScopeKey },
    /// Reorder lists the same task twice.
    DuplicateTaskInOrder(TaskId),
    /// Rank-slot limits are one-based.
    InvalidRankLimit(u32),
    Validation(TaskValidationError),
    Repo(RepoError),
}

impl TaskServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TaskNotFound(_) => ErrorKind::NotFound,
            Self::TaskOutsideScope { .. }
            | Self::DuplicateTaskInOrder(_)
            | Self::InvalidRankLimit(_)
            | Self::Validation(_) => ErrorKind::Validation,
            Self::Repo(_) => ErrorKind::Storage,
        }
    }
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::TaskOutsideScope { task_id, scope } => {
                write!(f, "task {task_id} is not in scope {scope}")
            }
            Self::DuplicateTaskInOrder(id) => {
                write!(f, "task {id} appears more than once in reorder request")
            }
            Self::InvalidRankLimit(limit) => write!(f, "rank limit must be >= 1, got {limit}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::TaskNotFound(id) => Self::TaskNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<TaskValidationError> for TaskServiceError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Candidate set for a filtered query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryTarget {
    /// One list, e.g. the owner's unscoped tasks.
    Scope(ScopeKey),
    /// Every task of the owner across all lists.
    Owner(OwnerId),
}

/// Task use-case service.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a task in `scope`.
    ///
    /// # Contract
    /// - `is_important` is stored as `false` whatever the draft says.
    /// - No rank or position is assigned; only a reorder does that.
    /// - A missing status defaults to `todo`.
    pub fn create_in_scope(&self, scope: &ScopeKey, draft: TaskDraft) -> TaskServiceResult<Task> {
        let new_task = NewTask {
            scope: *scope,
            title: draft.title.trim().to_string(),
            description: draft.description,
            status: draft
                .status
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TASK_STATUS.to_string()),
            due_date: draft.due_date,
            is_important: false,
        };
        new_task.validate()?;

        let task = self.repo.insert_task(&new_task)?;
        info!(
            "event=task_create module=task status=ok scope={} task_id={}",
            scope, task.id
        );
        Ok(task)
    }

    /// Loads one task, treating tasks of other scopes as missing.
    pub fn get_task(&self, scope: &ScopeKey, id: TaskId) -> TaskServiceResult<Task> {
        self.repo
            .get_task(id)?
            .filter(|task| task.belongs_to(scope))
            .ok_or(TaskServiceError::TaskNotFound(id))
    }

    /// Replaces the editable fields of one task.
    pub fn update_task(
        &self,
        scope: &ScopeKey,
        id: TaskId,
        update: TaskUpdate,
    ) -> TaskServiceResult<Task> {
        let mut task = self.get_task(scope, id)?;
        task.title = update.title.trim().to_string();
        task.description = update.description;
        task.status = update.status;
        task.due_date = update.due_date;
        task.is_important = update.is_important;

        let saved = self.repo.save_task(&task)?;
        info!(
            "event=task_update module=task status=ok scope={} task_id={}",
            scope, id
        );
        Ok(saved)
    }

    /// Lists one scope in natural order.
    pub fn list_scope(&self, scope: &ScopeKey) -> TaskServiceResult<Vec<Task>> {
        Ok(self.repo.list_scope_natural(scope)?)
    }

    /// Lists one scope by the positions of the last reorder.
    pub fn list_scope_by_position(&self, scope: &ScopeKey) -> TaskServiceResult<Vec<Task>> {
        Ok(self.repo.list_scope_by_position(scope)?)
    }

    /// Filters by importance and sorts by due date.
    ///
    /// Candidates are taken in id order so equal due dates keep creation order.
    pub fn query(
        &self,
        target: QueryTarget,
        importance: ImportanceFilter,
        direction: SortDirection,
    ) -> TaskServiceResult<Vec<Task>> {
        let mut candidates = match target {
            QueryTarget::Scope(scope) => self.repo.list_scope_natural(&scope)?,
            QueryTarget::Owner(owner) => self.repo.list_owner_tasks(owner)?,
        };
        candidates.sort_by_key(|task| task.id);

        let total = candidates.len();
        let result = filter_and_sort(candidates, importance, direction);
        debug!(
            "event=task_query module=task status=ok importance={:?} direction={:?} candidates={} returned={}",
            importance,
            direction,
            total,
            result.len()
        );
        Ok(result)
    }
}
