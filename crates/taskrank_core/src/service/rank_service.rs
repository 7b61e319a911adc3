//! Ranking engine and reindex-on-delete use-cases.
//!
//! # Responsibility
//! - Apply client-driven reorders: dense positions, limit-bounded ranks.
//! - Own the per-scope rank-slot limit.
//! - Delete tasks and recompute the scope's natural order.
//!
//! # Invariants
//! - Every id of a reorder is checked against the scope before any write.
//! - Tasks not listed in a reorder keep their rank and position.
//! - Each listed task is written individually, in request order. Once
//!   writes start the operation is not atomic.
//! - Deleting a task never rewrites the remaining tasks' ranks; the
//!   natural-order request is returned for the caller to dispatch.

use crate::config::{ConfigError, EngineConfig};
use crate::model::scope::ScopeKey;
use crate::model::task::{Task, TaskId};
use crate::rank::{find_duplicate, plan_assignments, ReorderRequest};
use crate::repo::task_repo::TaskRepository;
use crate::service::task_service::{TaskServiceError, TaskServiceResult};
use log::{info, warn};
use std::time::Instant;

/// Ranking engine over one task store.
pub struct RankService<R: TaskRepository> {
    repo: R,
    config: EngineConfig,
}

impl<R: TaskRepository> RankService<R> {
    /// Builds the engine, rejecting configs whose default limit is zero.
    pub fn new(repo: R, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { repo, config })
    }

    /// Current rank-slot limit of `scope`, falling back to the configured default.
    pub fn rank_limit(&self, scope: &ScopeKey) -> TaskServiceResult<u32> {
        Ok(self
            .repo
            .rank_limit(scope)?
            .unwrap_or(self.config.default_rank_limit))
    }

    /// Replaces the rank-slot limit of `scope`.
    ///
    /// Existing ranks are not rewritten; the limit applies from the next
    /// reorder on.
    pub fn set_rank_limit(&self, scope: &ScopeKey, limit: u32) -> TaskServiceResult<()> {
        if limit == 0 {
            return Err(TaskServiceError::InvalidRankLimit(limit));
        }
        self.repo.set_rank_limit(scope, limit)?;
        info!(
            "event=rank_limit_set module=rank status=ok scope={} limit={}",
            scope, limit
        );
        Ok(())
    }

    /// Applies an explicit order to `scope`.
    ///
    /// Returns the re-persisted tasks in request order.
    ///
    /// # Errors
    /// - `InvalidRankLimit` when `max_priority == Some(0)`.
    /// - `DuplicateTaskInOrder` when an id is listed twice.
    /// - `TaskOutsideScope` when an id is missing or belongs elsewhere.
    ///
    /// All three are raised before the first write.
    pub fn apply_order(
        &self,
        scope: &ScopeKey,
        request: &ReorderRequest,
    ) -> TaskServiceResult<Vec<Task>> {
        let started_at = Instant::now();

        if request.max_priority == Some(0) {
            return Err(TaskServiceError::InvalidRankLimit(0));
        }
        if let Some(task_id) = find_duplicate(&request.ordered_ids) {
            warn!(
                "event=task_reorder module=rank status=rejected scope={} error_code=duplicate_task task_id={}",
                scope, task_id
            );
            return Err(TaskServiceError::DuplicateTaskInOrder(task_id));
        }
        let mut tasks = self.load_scope_members(scope, &request.ordered_ids)?;

        if let Some(limit) = request.max_priority {
            self.set_rank_limit(scope, limit)?;
        }
        let limit = self.rank_limit(scope)?;

        let plan = plan_assignments(&request.ordered_ids, limit);
        let mut saved = Vec::with_capacity(plan.len());
        for (task, assignment) in tasks.iter_mut().zip(plan) {
            task.position = Some(assignment.position);
            task.priority_rank = assignment.priority_rank;
            saved.push(self.repo.save_task(task)?);
        }

        info!(
            "event=task_reorder module=rank status=ok scope={} count={} limit={} duration_ms={}",
            scope,
            saved.len(),
            limit,
            started_at.elapsed().as_millis()
        );
        Ok(saved)
    }

    /// Deletes one task and returns the scope's remaining tasks as a
    /// natural-order reorder request.
    ///
    /// Stored ranks and positions of the remaining tasks are left as they
    /// were; pass the returned request to `apply_order` to re-rank.
    pub fn on_delete(
        &self,
        scope: &ScopeKey,
        task_id: TaskId,
    ) -> TaskServiceResult<ReorderRequest> {
        let belongs = self
            .repo
            .get_task(task_id)?
            .is_some_and(|task| task.belongs_to(scope));
        if !belongs {
            return Err(TaskServiceError::TaskNotFound(task_id));
        }

        self.repo.delete_task(task_id)?;

        let remaining: Vec<TaskId> = self
            .repo
            .list_scope_natural(scope)?
            .into_iter()
            .map(|task| task.id)
            .collect();
        info!(
            "event=task_delete module=rank status=ok scope={} task_id={} remaining={}",
            scope,
            task_id,
            remaining.len()
        );
        Ok(ReorderRequest::new(remaining))
    }

    /// Highest rank currently stored in `scope`.
    pub fn max_stored_rank(&self, scope: &ScopeKey) -> TaskServiceResult<Option<u32>> {
        Ok(self.repo.max_rank_in_scope(scope)?)
    }

    fn load_scope_members(
        &self,
        scope: &ScopeKey,
        ordered_ids: &[TaskId],
    ) -> TaskServiceResult<Vec<Task>> {
        let mut tasks = Vec::with_capacity(ordered_ids.len());
        for &task_id in ordered_ids {
            match self.repo.get_task(task_id)? {
                Some(task) if task.belongs_to(scope) => tasks.push(task),
                _ => {
                    warn!(
                        "event=task_reorder module=rank status=rejected scope={} error_code=task_outside_scope task_id={}",
                        scope, task_id
                    );
                    return Err(TaskServiceError::TaskOutsideScope {
                        task_id,
                        scope: *scope,
                    });
                }
            }
        }
        Ok(tasks)
    }
}
