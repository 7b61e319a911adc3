//! Scope identity for task lists.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Owner identifier issued by the external identity collaborator.
pub type OwnerId = Uuid;

/// Store-assigned project identifier.
pub type ProjectId = i64;

/// Identifies one ranked task list: `(owner, project-or-none)`.
///
/// `project == None` is the owner's unscoped list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScopeKey {
    pub owner: OwnerId,
    pub project: Option<ProjectId>,
}

impl ScopeKey {
    /// Scope for tasks that are not attached to any project.
    pub fn unscoped(owner: OwnerId) -> Self {
        Self {
            owner,
            project: None,
        }
    }

    /// Scope for tasks attached to `project`.
    ///
    /// Callers are expected to have checked that `project` belongs to `owner`.
    pub fn project(owner: OwnerId, project: ProjectId) -> Self {
        Self {
            owner,
            project: Some(project),
        }
    }
}

impl Display for ScopeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.project {
            Some(project) => write!(f, "{}/project:{project}", self.owner),
            None => write!(f, "{}/unscoped", self.owner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ScopeKey;
    use uuid::Uuid;

    #[test]
    fn display_distinguishes_project_and_unscoped() {
        let owner = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
        assert_eq!(
            ScopeKey::unscoped(owner).to_string(),
            "11111111-2222-4333-8444-555555555555/unscoped"
        );
        assert_eq!(
            ScopeKey::project(owner, 7).to_string(),
            "11111111-2222-4333-8444-555555555555/project:7"
        );
    }
}
