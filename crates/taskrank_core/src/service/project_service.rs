//! Project use-case service and scope resolution.
//!
//! # Responsibility
//! - Per-owner project CRUD with unique, case-insensitive names.
//! - Resolve `(owner, project reference)` into a trusted `ScopeKey`.
//!
//! # Invariants
//! - A project owned by someone else is reported exactly like a missing one.
//! - Deleting a project deletes every task in its scope.

use crate::model::project::{normalize_project_name, Project};
use crate::model::scope::{OwnerId, ProjectId, ScopeKey};
use crate::repo::project_repo::ProjectRepository;
use crate::repo::RepoError;
use crate::service::ErrorKind;
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// How a caller names the list it wants to work on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectRef {
    /// The owner's list of tasks without a project.
    Unscoped,
    Id(ProjectId),
    /// Matched case-insensitively after whitespace normalization.
    Name(String),
}

/// Errors from project use-cases.
#[derive(Debug)]
pub enum ProjectServiceError {
    /// Name is blank after trim.
    InvalidName,
    /// Owner already has a project with an equivalent name.
    DuplicateName(String),
    ProjectNotFound(ProjectId),
    ProjectNameNotFound(String),
    Repo(RepoError),
}

impl ProjectServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidName => ErrorKind::Validation,
            Self::DuplicateName(_) => ErrorKind::Conflict,
            Self::ProjectNotFound(_) | Self::ProjectNameNotFound(_) => ErrorKind::NotFound,
            Self::Repo(_) => ErrorKind::Storage,
        }
    }
}

impl Display for ProjectServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "project name must not be blank"),
            Self::DuplicateName(name) => {
                write!(f, "project with name `{name}` already exists for this owner")
            }
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::ProjectNameNotFound(name) => write!(f, "project not found with name `{name}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProjectServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ProjectServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::ProjectNotFound(id) => Self::ProjectNotFound(id),
            RepoError::DuplicateProjectName(name) => Self::DuplicateName(name),
            other => Self::Repo(other),
        }
    }
}

pub type ProjectServiceResult<T> = Result<T, ProjectServiceError>;

/// Project use-case service.
pub struct ProjectService<P: ProjectRepository> {
    repo: P,
}

impl<P: ProjectRepository> ProjectService<P> {
    pub fn new(repo: P) -> Self {
        Self { repo }
    }

    /// Creates a project for `owner`.
    pub fn create_project(&self, owner: OwnerId, name: &str) -> ProjectServiceResult<Project> {
        let normalized = normalize_name(name)?;
        if self
            .repo
            .find_project_by_name(owner, &normalized)?
            .is_some()
        {
            return Err(ProjectServiceError::DuplicateName(normalized));
        }

        let project = self.repo.create_project(owner, &normalized)?;
        info!(
            "event=project_create module=project status=ok owner={} project_id={}",
            owner, project.id
        );
        Ok(project)
    }

    pub fn list_projects(&self, owner: OwnerId) -> ProjectServiceResult<Vec<Project>> {
        Ok(self.repo.list_projects(owner)?)
    }

    /// Loads a project by id; foreign projects are reported as missing.
    pub fn get_project(&self, owner: OwnerId, id: ProjectId) -> ProjectServiceResult<Project> {
        self.repo
            .get_project(id)?
            .filter(|project| project.owner == owner)
            .ok_or(ProjectServiceError::ProjectNotFound(id))
    }

    pub fn get_project_by_name(
        &self,
        owner: OwnerId,
        name: &str,
    ) -> ProjectServiceResult<Project> {
        self.repo
            .find_project_by_name(owner, name)?
            .ok_or_else(|| ProjectServiceError::ProjectNameNotFound(name.trim().to_string()))
    }

    pub fn rename_project(
        &self,
        owner: OwnerId,
        id: ProjectId,
        name: &str,
    ) -> ProjectServiceResult<Project> {
        let existing = self.get_project(owner, id)?;
        let normalized = normalize_name(name)?;
        if let Some(other) = self.repo.find_project_by_name(owner, &normalized)? {
            if other.id != existing.id {
                return Err(ProjectServiceError::DuplicateName(normalized));
            }
        }

        Ok(self.repo.rename_project(id, &normalized)?)
    }

    /// Deletes a project and all of its tasks. Returns the deleted task count.
    pub fn delete_project(&self, owner: OwnerId, id: ProjectId) -> ProjectServiceResult<usize> {
        self.get_project(owner, id)?;
        let deleted_tasks = self.repo.delete_project_with_tasks(id)?;
        info!(
            "event=project_delete module=project status=ok owner={} project_id={} deleted_tasks={}",
            owner, id, deleted_tasks
        );
        Ok(deleted_tasks)
    }

    /// Resolves the list a caller refers to, checking project ownership.
    ///
    /// Every scoped read or mutation goes through here first.
    pub fn resolve_scope(
        &self,
        owner: OwnerId,
        project: &ProjectRef,
    ) -> ProjectServiceResult<ScopeKey> {
        match project {
            ProjectRef::Unscoped => Ok(ScopeKey::unscoped(owner)),
            ProjectRef::Id(id) => Ok(self.get_project(owner, *id)?.scope()),
            ProjectRef::Name(name) => Ok(self.get_project_by_name(owner, name)?.scope()),
        }
    }
}

fn normalize_name(name: &str) -> ProjectServiceResult<String> {
    normalize_project_name(name).ok_or(ProjectServiceError::InvalidName)
}
