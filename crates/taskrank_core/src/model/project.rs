//! Project domain model and name normalization.

use crate::model::scope::{OwnerId, ProjectId, ScopeKey};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Named task list owned by exactly one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub owner: OwnerId,
    /// Display name as entered (trimmed, inner whitespace collapsed).
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Project {
    pub fn scope(&self) -> ScopeKey {
        ScopeKey::project(self.owner, self.id)
    }
}

/// Normalizes a display name: trims and collapses inner whitespace runs.
///
/// Returns `None` when nothing is left.
pub fn normalize_project_name(value: &str) -> Option<String> {
    let collapsed = WHITESPACE_RE.replace_all(value.trim(), " ");
    if collapsed.is_empty() {
        return None;
    }
    Some(collapsed.into_owned())
}

/// Case-folded key used for per-owner uniqueness and name lookup.
pub fn project_name_key(value: &str) -> Option<String> {
    normalize_project_name(value).map(|name| name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::{normalize_project_name, project_name_key};

    #[test]
    fn normalize_trims_and_collapses_whitespace() {
        assert_eq!(
            normalize_project_name("  Home \t  chores\n").as_deref(),
            Some("Home chores")
        );
    }

    #[test]
    fn normalize_rejects_blank_names() {
        assert_eq!(normalize_project_name(" \t "), None);
        assert_eq!(project_name_key(""), None);
    }

    #[test]
    fn name_key_is_case_insensitive() {
        assert_eq!(project_name_key(" Alpha  Beta"), project_name_key("alpha beta"));
    }
}
