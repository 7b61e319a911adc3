use rusqlite::Connection;
use std::collections::{BTreeSet, HashMap};
use taskrank_core::db::open_db_in_memory;
use taskrank_core::{
    ConfigError, EngineConfig, ErrorKind, RankService, ReorderRequest, ScopeKey, SqliteTaskRepository, Task,
    TaskDraft, TaskId, TaskService, TaskServiceError,
};
use uuid::Uuid;

type Repo<'conn> = SqliteTaskRepository<'conn>;

fn services(conn: &Connection) -> (TaskService<Repo<'_>>, RankService<Repo<'_>>) {
    (
        TaskService::new(SqliteTaskRepository::try_new(conn).unwrap()),
        RankService::new(
            SqliteTaskRepository::try_new(conn).unwrap(),
            EngineConfig::default(),
        )
        .unwrap(),
    )
}

fn seed(tasks: &TaskService<Repo<'_>>, scope: &ScopeKey, count: usize) -> Vec<TaskId> {
    (1..=count)
        .map(|n| {
            tasks
                .create_in_scope(scope, TaskDraft::new(format!("T{n}")))
                .unwrap()
                .id
        })
        .collect()
}

fn by_id(tasks: Vec<Task>) -> HashMap<TaskId, Task> {
    tasks.into_iter().map(|task| (task.id, task)).collect()
}

#[test]
fn reversed_order_with_limit_three_ranks_top_three() {
    let conn = open_db_in_memory().unwrap();
    let (tasks, ranks) = services(&conn);
    let scope = ScopeKey::unscoped(Uuid::new_v4());
    let ids = seed(&tasks, &scope, 5);
    let (t1, t2, t3, t4, t5) = (ids[0], ids[1], ids[2], ids[3], ids[4]);

    let saved = ranks
        .apply_order(&scope, &ReorderRequest::new(vec![t5, t4, t3, t2, t1]).with_max_priority(3))
        .unwrap();
    assert_eq!(
        saved.iter().map(|task| task.id).collect::<Vec<_>>(),
        vec![t5, t4, t3, t2, t1]
    );

    let stored = by_id(tasks.list_scope(&scope).unwrap());
    assert_eq!(stored[&t5].priority_rank, Some(1));
    assert_eq!(stored[&t4].priority_rank, Some(2));
    assert_eq!(stored[&t3].priority_rank, Some(3));
    assert_eq!(stored[&t2].priority_rank, None);
    assert_eq!(stored[&t1].priority_rank, None);
    assert_eq!(stored[&t5].position, Some(1));
    assert_eq!(stored[&t4].position, Some(2));
    assert_eq!(stored[&t3].position, Some(3));
    assert_eq!(stored[&t2].position, Some(4));
    assert_eq!(stored[&t1].position, Some(5));
}

#[test]
fn ranks_are_dense_and_bounded_for_every_limit() {
    let conn = open_db_in_memory().unwrap();
    let (tasks, ranks) = services(&conn);
    let scope = ScopeKey::unscoped(Uuid::new_v4());
    let ids = seed(&tasks, &scope, 4);

    for limit in 1..=6u32 {
        ranks
            .apply_order(&scope, &ReorderRequest::new(ids.clone()).with_max_priority(limit))
            .unwrap();

        let ranked: BTreeSet<u32> = tasks
            .list_scope(&scope)
            .unwrap()
            .into_iter()
            .filter_map(|task| task.priority_rank)
            .collect();
        let expected: BTreeSet<u32> = (1..=limit.min(ids.len() as u32)).collect();
        assert_eq!(ranked, expected, "limit={limit}");
    }
}

#[test]
fn unlisted_tasks_keep_previous_rank_and_position() {
    let conn = open_db_in_memory().unwrap();
    let (tasks, ranks) = services(&conn);
    let scope = ScopeKey::unscoped(Uuid::new_v4());
    let ids = seed(&tasks, &scope, 4);

    ranks
        .apply_order(&scope, &ReorderRequest::new(ids.clone()))
        .unwrap();
    let before = by_id(tasks.list_scope(&scope).unwrap());

    ranks
        .apply_order(&scope, &ReorderRequest::new(vec![ids[3], ids[2]]))
        .unwrap();
    let after = by_id(tasks.list_scope(&scope).unwrap());

    for untouched in [ids[0], ids[1]] {
        assert_eq!(after[&untouched].priority_rank, before[&untouched].priority_rank);
        assert_eq!(after[&untouched].position, before[&untouched].position);
    }
    assert_eq!(after[&ids[3]].priority_rank, Some(1));
    assert_eq!(after[&ids[2]].priority_rank, Some(2));
}

#[test]
fn foreign_task_aborts_before_any_write() {
    let conn = open_db_in_memory().unwrap();
    let (tasks, ranks) = services(&conn);
    let scope = ScopeKey::unscoped(Uuid::new_v4());
    let other_scope = ScopeKey::unscoped(Uuid::new_v4());
    let ids = seed(&tasks, &scope, 2);
    let foreign = seed(&tasks, &other_scope, 1)[0];

    let err = ranks
        .apply_order(
            &scope,
            &ReorderRequest::new(vec![ids[0], foreign, ids[1]]).with_max_priority(5),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        TaskServiceError::TaskOutsideScope { task_id, .. } if task_id == foreign
    ));
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert!(tasks
        .list_scope(&scope)
        .unwrap()
        .iter()
        .all(|task| task.priority_rank.is_none() && task.position.is_none()));
    assert_eq!(ranks.rank_limit(&scope).unwrap(), 3);
}

#[test]
fn missing_task_is_a_validation_error() {
    let conn = open_db_in_memory().unwrap();
    let (tasks, ranks) = services(&conn);
    let scope = ScopeKey::unscoped(Uuid::new_v4());
    let ids = seed(&tasks, &scope, 1);

    let err = ranks
        .apply_order(&scope, &ReorderRequest::new(vec![ids[0], 9_999]))
        .unwrap_err();
    assert!(matches!(err, TaskServiceError::TaskOutsideScope { task_id: 9_999, .. }));
}

#[test]
fn duplicate_ids_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let (tasks, ranks) = services(&conn);
    let scope = ScopeKey::unscoped(Uuid::new_v4());
    let ids = seed(&tasks, &scope, 2);

    let err = ranks
        .apply_order(&scope, &ReorderRequest::new(vec![ids[0], ids[1], ids[0]]))
        .unwrap_err();
    assert!(matches!(err, TaskServiceError::DuplicateTaskInOrder(id) if id == ids[0]));
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn max_priority_persists_per_scope() {
    let conn = open_db_in_memory().unwrap();
    let (tasks, ranks) = services(&conn);
    let owner = Uuid::new_v4();
    let scope = ScopeKey::unscoped(owner);
    let other = ScopeKey::unscoped(Uuid::new_v4());
    let ids = seed(&tasks, &scope, 4);

    ranks
        .apply_order(&scope, &ReorderRequest::new(ids.clone()).with_max_priority(1))
        .unwrap();
    assert_eq!(ranks.rank_limit(&scope).unwrap(), 1);
    assert_eq!(ranks.rank_limit(&other).unwrap(), 3);

    // Later reorders without an override reuse the stored limit.
    let saved = ranks
        .apply_order(&scope, &ReorderRequest::new(ids.clone()))
        .unwrap();
    let ranked: Vec<_> = saved.iter().filter_map(|task| task.priority_rank).collect();
    assert_eq!(ranked, vec![1]);
}

#[test]
fn set_rank_limit_applies_on_next_pass_only() {
    let conn = open_db_in_memory().unwrap();
    let (tasks, ranks) = services(&conn);
    let scope = ScopeKey::unscoped(Uuid::new_v4());
    let ids = seed(&tasks, &scope, 3);

    ranks
        .apply_order(&scope, &ReorderRequest::new(ids.clone()))
        .unwrap();
    ranks.set_rank_limit(&scope, 1).unwrap();

    assert_eq!(ranks.max_stored_rank(&scope).unwrap(), Some(3));

    ranks
        .apply_order(&scope, &ReorderRequest::new(ids.clone()))
        .unwrap();
    assert_eq!(ranks.max_stored_rank(&scope).unwrap(), Some(1));
}

#[test]
fn zero_limit_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let (_, ranks) = services(&conn);
    let scope = ScopeKey::unscoped(Uuid::new_v4());

    let err = ranks.set_rank_limit(&scope, 0).unwrap_err();
    assert!(matches!(err, TaskServiceError::InvalidRankLimit(0)));

    let err = ranks
        .apply_order(&scope, &ReorderRequest::new(vec![]).with_max_priority(0))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn configured_default_limit_applies_to_fresh_scopes() {
    let conn = open_db_in_memory().unwrap();
    let tasks = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let ranks = RankService::new(
        SqliteTaskRepository::try_new(&conn).unwrap(),
        EngineConfig::with_default_rank_limit(2).unwrap(),
    )
    .unwrap();
    let scope = ScopeKey::unscoped(Uuid::new_v4());
    let ids = seed(&tasks, &scope, 3);

    let saved = ranks.apply_order(&scope, &ReorderRequest::new(ids)).unwrap();
    let ranked: Vec<_> = saved.iter().map(|task| task.priority_rank).collect();
    assert_eq!(ranked, vec![Some(1), Some(2), None]);
}

#[test]
fn zero_default_limit_from_config_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let config: EngineConfig = serde_json::from_str(r#"{"default_rank_limit":0}"#).unwrap();

    let result = RankService::new(SqliteTaskRepository::try_new(&conn).unwrap(), config);
    assert!(matches!(result, Err(ConfigError::ZeroRankLimit)));

    let literal = EngineConfig {
        default_rank_limit: 0,
    };
    assert!(RankService::new(SqliteTaskRepository::try_new(&conn).unwrap(), literal).is_err());
}

#[test]
fn position_listing_follows_last_reorder() {
    let conn = open_db_in_memory().unwrap();
    let (tasks, ranks) = services(&conn);
    let scope = ScopeKey::unscoped(Uuid::new_v4());
    let ids = seed(&tasks, &scope, 3);

    ranks
        .apply_order(&scope, &ReorderRequest::new(vec![ids[2], ids[0]]))
        .unwrap();

    let listed: Vec<_> = tasks
        .list_scope_by_position(&scope)
        .unwrap()
        .into_iter()
        .map(|task| task.id)
        .collect();
    // Unpositioned tasks trail the explicitly ordered ones.
    assert_eq!(listed, vec![ids[2], ids[0], ids[1]]);
}
