//! Explicit reorder planning.

use crate::model::task::TaskId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Client-supplied reorder for one scope.
///
/// Wire names follow the established `orderedIds` / `maxPriority` shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    /// Tasks in their new order, highest priority first.
    pub ordered_ids: Vec<TaskId>,
    /// Replaces the scope's rank-slot limit before ranking when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_priority: Option<u32>,
}

impl ReorderRequest {
    pub fn new(ordered_ids: Vec<TaskId>) -> Self {
        Self {
            ordered_ids,
            max_priority: None,
        }
    }

    pub fn with_max_priority(mut self, limit: u32) -> Self {
        self.max_priority = Some(limit);
        self
    }
}

/// Rank and position computed for one listed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankAssignment {
    pub task_id: TaskId,
    pub position: u32,
    pub priority_rank: Option<u32>,
}

/// Computes dense positions and limit-bounded ranks for `ordered_ids`.
///
/// Position `p` (one-based) gets rank `p` when `p <= limit`, otherwise no rank.
pub fn plan_assignments(ordered_ids: &[TaskId], limit: u32) -> Vec<RankAssignment> {
    ordered_ids
        .iter()
        .zip(1u32..)
        .map(|(&task_id, position)| RankAssignment {
            task_id,
            position,
            priority_rank: (position <= limit).then_some(position),
        })
        .collect()
}

/// Returns the first id that appears more than once.
pub fn find_duplicate(ordered_ids: &[TaskId]) -> Option<TaskId> {
    let mut seen = HashSet::with_capacity(ordered_ids.len());
    ordered_ids.iter().copied().find(|id| !seen.insert(*id))
}
