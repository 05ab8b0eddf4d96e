//! Named, ordered batches of change records.

use serde::Serialize;
use std::collections::BTreeSet;

use super::change::ChangeRecord;
use crate::fs::PathResult;
use crate::types::ContentId;

/// One cohesive unit of change, e.g. "apply nginx config".
///
/// Record order is significant: a later record for the same path wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layer {
    name: String,
    changes: Vec<ChangeRecord>,
}

impl Layer {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), changes: Vec::new() }
    }

    pub fn from_changes(name: impl Into<String>, changes: Vec<ChangeRecord>) -> Self {
        Self { name: name.into(), changes }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn changes(&self) -> &[ChangeRecord] {
        &self.changes
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn push(&mut self, change: ChangeRecord) {
        self.changes.push(change);
    }

    pub fn with_change(mut self, change: ChangeRecord) -> Self {
        self.push(change);
        self
    }

    pub fn with_added(self, path: &str, content_id: impl Into<ContentId>) -> PathResult<Self> {
        Ok(self.with_change(ChangeRecord::added(path, content_id)?))
    }

    pub fn with_modified(
        self,
        path: &str,
        content_id: impl Into<ContentId>,
        previous_content_id: Option<ContentId>,
    ) -> PathResult<Self> {
        Ok(self.with_change(ChangeRecord::modified(path, content_id, previous_content_id)?))
    }

    pub fn with_removed(self, path: &str) -> PathResult<Self> {
        Ok(self.with_change(ChangeRecord::removed(path)?))
    }

    /// Distinct paths touched by this layer.
    pub fn touched_paths(&self) -> BTreeSet<&str> {
        self.changes.iter().map(|c| c.path()).collect()
    }

    /// Added/Modified records that carry no content id.
    pub fn malformed_records(&self) -> impl Iterator<Item = &ChangeRecord> {
        self.changes.iter().filter(|c| c.is_malformed())
    }
}
