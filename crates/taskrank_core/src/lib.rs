//! Core ranked-list engine for scoped task lists.
//! This crate is the single source of truth for ranking invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod rank;
pub mod repo;
pub mod service;

pub use config::{ConfigError, EngineConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::project::Project;
pub use model::scope::{OwnerId, ProjectId, ScopeKey};
pub use model::task::{Task, TaskDraft, TaskId, TaskUpdate, TaskValidationError};
pub use rank::{ImportanceFilter, ReorderRequest, SortDirection, DEFAULT_RANK_LIMIT};
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::project_service::{ProjectRef, ProjectService, ProjectServiceError};
pub use service::rank_service::RankService;
pub use service::task_service::{QueryTarget, TaskService, TaskServiceError};
pub use service::ErrorKind;

/// Health check for embedding callers.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
