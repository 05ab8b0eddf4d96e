//! Path-level change records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::fs::path::normalize_path;
use crate::fs::{PathError, PathResult};
use crate::types::ContentId;

/// Kind of mutation a record applies to its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
    /// Reserved for attribute changes; has no effect on the materialized state.
    PermissionChanged,
}

impl ChangeKind {
    /// Whether records of this kind must carry a new content id.
    pub fn writes_content(&self) -> bool {
        matches!(self, ChangeKind::Added | ChangeKind::Modified)
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKind::Added => write!(f, "added"),
            ChangeKind::Modified => write!(f, "modified"),
            ChangeKind::Removed => write!(f, "removed"),
            ChangeKind::PermissionChanged => write!(f, "permission_changed"),
        }
    }
}

/// One filesystem mutation.
///
/// Always built through [`ChangeRecord::new`], deserialization included, so
/// the path is normalised and `Removed` records carry no content id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawChangeRecord")]
pub struct ChangeRecord {
    path: String,
    kind: ChangeKind,
    new_content_id: Option<ContentId>,
    /// Caller-side audit value, never consulted by materialization.
    previous_content_id: Option<ContentId>,
}

#[derive(Deserialize)]
struct RawChangeRecord {
    path: String,
    kind: ChangeKind,
    #[serde(default)]
    new_content_id: Option<ContentId>,
    #[serde(default)]
    previous_content_id: Option<ContentId>,
}

impl TryFrom<RawChangeRecord> for ChangeRecord {
    type Error = PathError;

    fn try_from(raw: RawChangeRecord) -> PathResult<Self> {
        Self::new(&raw.path, raw.kind, raw.new_content_id, raw.previous_content_id)
    }
}

impl ChangeRecord {
    /// Build a record with a normalised path.
    ///
    /// A content id supplied for a `Removed` record is dropped.
    pub fn new(
        path: &str,
        kind: ChangeKind,
        new_content_id: Option<ContentId>,
        previous_content_id: Option<ContentId>,
    ) -> PathResult<Self> {
        let new_content_id = match kind {
            ChangeKind::Removed => None,
            _ => new_content_id,
        };

        Ok(Self { path: normalize_path(path)?, kind, new_content_id, previous_content_id })
    }

    pub fn added(path: &str, content_id: impl Into<ContentId>) -> PathResult<Self> {
        Self::new(path, ChangeKind::Added, Some(content_id.into()), None)
    }

    pub fn modified(
        path: &str,
        content_id: impl Into<ContentId>,
        previous_content_id: Option<ContentId>,
    ) -> PathResult<Self> {
        Self::new(path, ChangeKind::Modified, Some(content_id.into()), previous_content_id)
    }

    pub fn removed(path: &str) -> PathResult<Self> {
        Self::new(path, ChangeKind::Removed, None, None)
    }

    pub fn permission_changed(path: &str) -> PathResult<Self> {
        Self::new(path, ChangeKind::PermissionChanged, None, None)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn new_content_id(&self) -> Option<&str> {
        self.new_content_id.as_deref()
    }

    pub fn previous_content_id(&self) -> Option<&str> {
        self.previous_content_id.as_deref()
    }

    /// An Added/Modified record without a content id.
    ///
    /// Materialization treats these as no-ops.
    pub fn is_malformed(&self) -> bool {
        self.kind.writes_content() && self.new_content_id.is_none()
    }
}
