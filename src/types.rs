//! Shared identifier and state types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Opaque content identifier (usually a hash). Never dereferenced.
pub type ContentId = String;

/// Materialized view of a plan: path -> content identifier.
pub type FileSystemState = BTreeMap<String, ContentId>;

/// Stable handle of a plan inside a [`crate::plan::PlanStore`].
///
/// Handles are never reused, so a stale handle can only fail lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlanHandle(Uuid);

impl PlanHandle {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for PlanHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
