//! Project repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist per-owner projects with case-insensitive unique names.
//! - Remove a project together with every task in its scope.
//!
//! # Invariants
//! - `name_key` is the lowercase normalized name and is unique per owner.
//! - Project deletion never leaves tasks pointing at a missing project.

use crate::model::project::{normalize_project_name, project_name_key, Project};
use crate::model::scope::{OwnerId, ProjectId};
use crate::repo::task_repo::delete_scope_rows;
use crate::repo::{ensure_connection_ready, parse_owner, RepoError, RepoResult};
use rusqlite::{params, Connection, ErrorCode, Row, Transaction, TransactionBehavior};

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    owner_uuid,
    name,
    created_at,
    updated_at
FROM projects";

/// Store contract for projects.
pub trait ProjectRepository {
    fn create_project(&self, owner: OwnerId, name: &str) -> RepoResult<Project>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    /// Case-insensitive, whitespace-normalized lookup within one owner.
    fn find_project_by_name(&self, owner: OwnerId, name: &str) -> RepoResult<Option<Project>>;
    fn list_projects(&self, owner: OwnerId) -> RepoResult<Vec<Project>>;
    fn rename_project(&self, id: ProjectId, name: &str) -> RepoResult<Project>;
    /// Deletes a project and every task in its scope atomically.
    ///
    /// Returns the number of deleted tasks.
    fn delete_project_with_tasks(&self, id: ProjectId) -> RepoResult<usize>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["projects", "tasks"])?;
        Ok(Self { conn })
    }

    fn load_required_project(&self, id: ProjectId) -> RepoResult<Project> {
        self.get_project(id)?.ok_or(RepoError::ProjectNotFound(id))
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, owner: OwnerId, name: &str) -> RepoResult<Project> {
        let (display, key) = normalized_name_pair(name)?;

        let inserted = self.conn.execute(
            "INSERT INTO projects (owner_uuid, name, name_key) VALUES (?1, ?2, ?3);",
            params![owner.to_string(), display.as_str(), key.as_str()],
        );
        map_unique_violation(inserted, &display)?;

        self.load_required_project(self.conn.last_insert_rowid())
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }
        Ok(None)
    }

    fn find_project_by_name(&self, owner: OwnerId, name: &str) -> RepoResult<Option<Project>> {
        let Some(key) = project_name_key(name) else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL} WHERE owner_uuid = ?1 AND name_key = ?2 LIMIT 1;"
        ))?;
        let mut rows = stmt.query(params![owner.to_string(), key])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }
        Ok(None)
    }

    fn list_projects(&self, owner: OwnerId) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL} WHERE owner_uuid = ?1 ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query([owner.to_string()])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn rename_project(&self, id: ProjectId, name: &str) -> RepoResult<Project> {
        let (display, key) = normalized_name_pair(name)?;

        let changed = self.conn.execute(
            "UPDATE projects
             SET name = ?2,
                 name_key = ?3,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![id, display.as_str(), key.as_str()],
        );
        if map_unique_violation(changed, &display)? == 0 {
            return Err(RepoError::ProjectNotFound(id));
        }

        self.load_required_project(id)
    }

    fn delete_project_with_tasks(&self, id: ProjectId) -> RepoResult<usize> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let project = self.load_required_project(id)?;

        let deleted_tasks = delete_scope_rows(&tx, &project.scope())?;
        tx.execute("DELETE FROM projects WHERE id = ?1;", [id])?;

        tx.commit()?;
        Ok(deleted_tasks)
    }
}

fn normalized_name_pair(name: &str) -> RepoResult<(String, String)> {
    let display = normalize_project_name(name)
        .ok_or_else(|| RepoError::InvalidData("project name must not be blank".to_string()))?;
    let key = display.to_lowercase();
    Ok((display, key))
}

fn map_unique_violation(result: rusqlite::Result<usize>, name: &str) -> RepoResult<usize> {
    match result {
        Ok(changed) => Ok(changed),
        Err(rusqlite::Error::SqliteFailure(err, _))
            if err.code == ErrorCode::ConstraintViolation =>
        {
            Err(RepoError::DuplicateProjectName(name.to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let owner_text: String = row.get("owner_uuid")?;
    Ok(Project {
        id: row.get("id")?,
        owner: parse_owner(&owner_text, "projects.owner_uuid")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
