//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `taskrank_core` wiring end to end against a real SQLite store.
//! - Keep output deterministic apart from the generated owner id.
//!
//! Environment:
//! - `TASKRANK_DB`: database file; in-memory when unset.
//! - `TASKRANK_LOG_DIR`: absolute log directory; logging stays off when unset.
//! - `TASKRANK_LOG_LEVEL`: defaults to the build-mode level.
//! - `TASKRANK_RANK_LIMIT`: default rank-slot limit, `3` when unset.

use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::process::ExitCode;
use taskrank_core::db::{open_db, open_db_in_memory};
use taskrank_core::{
    core_version, default_log_level, init_logging, EngineConfig, ImportanceFilter, QueryTarget,
    RankService, ReorderRequest, ScopeKey, SortDirection, SqliteTaskRepository, Task, TaskDraft,
    TaskService,
};
use uuid::Uuid;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("taskrank error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var("TASKRANK_LOG_DIR") {
        let level = std::env::var("TASKRANK_LOG_LEVEL")
            .unwrap_or_else(|_| default_log_level().to_string());
        init_logging(&level, &log_dir)?;
    }

    let config = match std::env::var("TASKRANK_RANK_LIMIT") {
        Ok(raw) => EngineConfig::with_default_rank_limit(EngineConfig::parse_rank_limit(&raw)?)?,
        Err(_) => EngineConfig::default(),
    };

    let conn = match std::env::var("TASKRANK_DB") {
        Ok(path) => open_db(path)?,
        Err(_) => open_db_in_memory()?,
    };

    let tasks = TaskService::new(SqliteTaskRepository::try_new(&conn)?);
    let ranks = RankService::new(SqliteTaskRepository::try_new(&conn)?, config)?;

    let scope = ScopeKey::unscoped(Uuid::new_v4());
    println!("taskrank_core version={}", core_version());
    println!("scope={scope} rank_limit={}", ranks.rank_limit(&scope)?);

    let mut ids = Vec::new();
    for (title, day) in [("draft", 9), ("review", 10), ("ship", 11), ("announce", 12)] {
        let due = NaiveDate::from_ymd_opt(2025, 11, day).ok_or("invalid demo date")?;
        let task = tasks.create_in_scope(&scope, TaskDraft::new(title).with_due_date(due))?;
        ids.push(task.id);
    }

    ids.reverse();
    let ranked = ranks.apply_order(&scope, &ReorderRequest::new(ids))?;
    info!(
        "event=cli_demo module=cli status=ok scope={} ranked={}",
        scope,
        ranked.len()
    );
    println!("after reorder:");
    print_tasks(&ranked);

    println!("query ALL DESC:");
    print_tasks(&tasks.query(
        QueryTarget::Scope(scope),
        ImportanceFilter::All,
        SortDirection::Desc,
    )?);
    Ok(())
}

fn print_tasks(tasks: &[Task]) {
    for task in tasks {
        println!(
            "  id={} title={} due={} position={} rank={}",
            task.id,
            task.title,
            task.due_date
                .map_or_else(|| "-".to_string(), |date| date.to_string()),
            task.position
                .map_or_else(|| "-".to_string(), |value| value.to_string()),
            task.priority_rank
                .map_or_else(|| "-".to_string(), |value| value.to_string()),
        );
    }
}
