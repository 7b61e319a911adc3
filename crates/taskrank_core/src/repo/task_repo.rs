//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the store operations consumed by the ranking engine.
//! - Persist per-scope rank-slot limits next to the tasks they bound.
//!
//! # Invariants
//! - Write paths call `Task::validate()` / `NewTask::validate()` first.
//! - Natural-order listing is
//!   `is_important DESC, due_date ASC (NULL last), id ASC`.
//! - Position listing is `position ASC (NULL last), id ASC`.

use crate::model::scope::{OwnerId, ScopeKey};
use crate::model::task::{NewTask, Task, TaskId};
use crate::repo::{
    bool_to_int, ensure_connection_ready, parse_bool, parse_owner, RepoError, RepoResult,
};
use rusqlite::{params, Connection, OptionalExtension, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    owner_uuid,
    project_id,
    title,
    description,
    status,
    due_date,
    is_important,
    priority_rank,
    position,
    created_at,
    updated_at
FROM tasks";

const SCOPE_FILTER_SQL: &str = "WHERE owner_uuid = ?1 AND project_id IS ?2";
const NATURAL_ORDER_SQL: &str =
    "ORDER BY is_important DESC, due_date IS NULL ASC, due_date ASC, id ASC";
const POSITION_ORDER_SQL: &str = "ORDER BY position IS NULL ASC, position ASC, id ASC";

/// Store contract for scoped task lists.
pub trait TaskRepository {
    /// Inserts a new task; the store assigns id and timestamps.
    fn insert_task(&self, task: &NewTask) -> RepoResult<Task>;
    /// Upserts a full record by id and returns the stored row.
    fn save_task(&self, task: &Task) -> RepoResult<Task>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Lists one scope in natural order.
    fn list_scope_natural(&self, scope: &ScopeKey) -> RepoResult<Vec<Task>>;
    /// Lists one scope by explicit position; unpositioned tasks come last.
    fn list_scope_by_position(&self, scope: &ScopeKey) -> RepoResult<Vec<Task>>;
    /// Lists every task of one owner across scopes, id ascending.
    fn list_owner_tasks(&self, owner: OwnerId) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
    /// Deletes all tasks of one scope and returns how many were removed.
    fn delete_scope_tasks(&self, scope: &ScopeKey) -> RepoResult<usize>;
    /// Highest rank currently stored in a scope.
    ///
    /// Legacy query kept for callers that predate explicit rank limits.
    fn max_rank_in_scope(&self, scope: &ScopeKey) -> RepoResult<Option<u32>>;
    /// Stored rank-slot limit for a scope, if one was ever set.
    fn rank_limit(&self, scope: &ScopeKey) -> RepoResult<Option<u32>>;
    fn set_rank_limit(&self, scope: &ScopeKey, limit: u32) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Creates a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["tasks", "scope_settings"])?;
        Ok(Self { conn })
    }

    fn query_tasks<P: rusqlite::Params>(&self, sql: &str, params: P) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn load_required_task(&self, id: TaskId) -> RepoResult<Task> {
        self.get_task(id)?.ok_or(RepoError::TaskNotFound(id))
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn insert_task(&self, task: &NewTask) -> RepoResult<Task> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                owner_uuid,
                project_id,
                title,
                description,
                status,
                due_date,
                is_important
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                task.scope.owner.to_string(),
                task.scope.project,
                task.title.as_str(),
                task.description.as_str(),
                task.status.as_str(),
                task.due_date,
                bool_to_int(task.is_important),
            ],
        )?;

        self.load_required_task(self.conn.last_insert_rowid())
    }

    fn save_task(&self, task: &Task) -> RepoResult<Task> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                id,
                owner_uuid,
                project_id,
                title,
                description,
                status,
                due_date,
                is_important,
                priority_rank,
                position
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT (id) DO UPDATE SET
                owner_uuid = excluded.owner_uuid,
                project_id = excluded.project_id,
                title = excluded.title,
                description = excluded.description,
                status = excluded.status,
                due_date = excluded.due_date,
                is_important = excluded.is_important,
                priority_rank = excluded.priority_rank,
                position = excluded.position,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                task.id,
                task.owner.to_string(),
                task.project,
                task.title.as_str(),
                task.description.as_str(),
                task.status.as_str(),
                task.due_date,
                bool_to_int(task.is_important),
                task.priority_rank,
                task.position,
            ],
        )?;

        self.load_required_task(task.id)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }
        Ok(None)
    }

    fn list_scope_natural(&self, scope: &ScopeKey) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            &format!("{TASK_SELECT_SQL} {SCOPE_FILTER_SQL} {NATURAL_ORDER_SQL};"),
            params![scope.owner.to_string(), scope.project],
        )
    }

    fn list_scope_by_position(&self, scope: &ScopeKey) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            &format!("{TASK_SELECT_SQL} {SCOPE_FILTER_SQL} {POSITION_ORDER_SQL};"),
            params![scope.owner.to_string(), scope.project],
        )
    }

    fn list_owner_tasks(&self, owner: OwnerId) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            &format!("{TASK_SELECT_SQL} WHERE owner_uuid = ?1 ORDER BY id ASC;"),
            [owner.to_string()],
        )
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::TaskNotFound(id));
        }
        Ok(())
    }

    fn delete_scope_tasks(&self, scope: &ScopeKey) -> RepoResult<usize> {
        delete_scope_rows(self.conn, scope)
    }

    fn max_rank_in_scope(&self, scope: &ScopeKey) -> RepoResult<Option<u32>> {
        let max = self.conn.query_row(
            &format!("SELECT MAX(priority_rank) FROM tasks {SCOPE_FILTER_SQL};"),
            params![scope.owner.to_string(), scope.project],
            |row| row.get::<_, Option<u32>>(0),
        )?;
        Ok(max)
    }

    fn rank_limit(&self, scope: &ScopeKey) -> RepoResult<Option<u32>> {
        let limit = self
            .conn
            .query_row(
                "SELECT rank_limit FROM scope_settings WHERE scope_key = ?1;",
                [scope.to_string()],
                |row| row.get::<_, u32>(0),
            )
            .optional()?;
        Ok(limit)
    }

    fn set_rank_limit(&self, scope: &ScopeKey, limit: u32) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO scope_settings (scope_key, owner_uuid, project_id, rank_limit)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (scope_key) DO UPDATE SET
                rank_limit = excluded.rank_limit,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                scope.to_string(),
                scope.owner.to_string(),
                scope.project,
                limit,
            ],
        )?;
        Ok(())
    }
}

/// Deletes every task of `scope` on `conn`, which may be an open transaction.
pub(crate) fn delete_scope_rows(conn: &Connection, scope: &ScopeKey) -> RepoResult<usize> {
    let changed = conn.execute(
        &format!("DELETE FROM tasks {SCOPE_FILTER_SQL};"),
        params![scope.owner.to_string(), scope.project],
    )?;
    Ok(changed)
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let owner_text: String = row.get("owner_uuid")?;
    let owner = parse_owner(&owner_text, "tasks.owner_uuid")?;
    let is_important = parse_bool(row.get("is_important")?, "tasks.is_important")?;

    let task = Task {
        id: row.get("id")?,
        owner,
        project: row.get("project_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        status: row.get("status")?,
        due_date: row.get("due_date")?,
        is_important,
        priority_rank: row.get("priority_rank")?,
        position: row.get("position")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    task.validate()?;
    Ok(task)
}
