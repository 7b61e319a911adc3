//! Reorder planning and filter/sort rules.
//!
//! # Responsibility
//! - Hold the storage-free rules of the ranked-list engine.
//! - Stay deterministic so services and repositories can share them.
//!
//! # Invariants
//! - Ranks assigned by one reorder pass are exactly `1..=min(K, n)`.
//! - Positions assigned by one reorder pass are exactly `1..=n`.
//! - Natural order lives in the task store query, not here.

pub mod filter;
pub mod order;

pub use filter::{filter_and_sort, ImportanceFilter, SortDirection};
pub use order::{find_duplicate, plan_assignments, RankAssignment, ReorderRequest};

/// Rank-slot limit used when neither config nor scope settings override it.
pub const DEFAULT_RANK_LIMIT: u32 = 3;
