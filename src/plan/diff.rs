//! Path-level comparison of two materialized states.

use serde::Serialize;
use std::fmt;

use crate::types::{ContentId, FileSystemState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    Added,
    Removed,
    Modified,
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffKind::Added => write!(f, "+"),
            DiffKind::Removed => write!(f, "-"),
            DiffKind::Modified => write!(f, "~"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathChange {
    pub path: String,
    pub kind: DiffKind,
    pub old: Option<ContentId>,
    pub new: Option<ContentId>,
}

/// Changes that turn `from` into `to`, sorted by path.
pub fn diff_states(from: &FileSystemState, to: &FileSystemState) -> Vec<PathChange> {
    let mut changes: Vec<PathChange> = from
        .iter()
        .filter_map(|(path, old)| match to.get(path) {
            None => Some(PathChange {
                path: path.clone(),
                kind: DiffKind::Removed,
                old: Some(old.clone()),
                new: None,
            }),
            Some(new) if new != old => Some(PathChange {
                path: path.clone(),
                kind: DiffKind::Modified,
                old: Some(old.clone()),
                new: Some(new.clone()),
            }),
            Some(_) => None,
        })
        .collect();

    changes.extend(to.iter().filter(|(path, _)| !from.contains_key(*path)).map(|(path, new)| {
        PathChange { path: path.clone(), kind: DiffKind::Added, old: None, new: Some(new.clone()) }
    }));

    changes.sort_by(|a, b| a.path.cmp(&b.path));
    changes
}
