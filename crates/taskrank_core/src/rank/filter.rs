//! Importance filtering and due-date sorting for task queries.

use crate::model::task::Task;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Importance partition applied before sorting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImportanceFilter {
    #[default]
    All,
    ImportantOnly,
    NormalOnly,
}

impl ImportanceFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::ImportantOnly => task.is_important,
            Self::NormalOnly => !task.is_important,
        }
    }
}

/// Due-date direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Filters by importance and sorts by due date.
///
/// Tasks without a due date go last in both directions. Equal dates keep
/// their input order.
pub fn filter_and_sort(
    tasks: Vec<Task>,
    importance: ImportanceFilter,
    direction: SortDirection,
) -> Vec<Task> {
    let mut selected: Vec<Task> = tasks
        .into_iter()
        .filter(|task| importance.matches(task))
        .collect();
    selected.sort_by(|a, b| due_date_cmp(a, b, direction));
    selected
}

fn due_date_cmp(a: &Task, b: &Task, direction: SortDirection) -> Ordering {
    match (a.due_date, b.due_date) {
        (Some(left), Some(right)) => match direction {
            SortDirection::Asc => left.cmp(&right),
            SortDirection::Desc => right.cmp(&left),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
