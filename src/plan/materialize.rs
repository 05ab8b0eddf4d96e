//! Folding layers into a path -> content mapping.
//!
//! Chains are walked root to leaf; inside a plan, layers are applied in
//! order and records in order, so the last write for a path wins.

use serde::Serialize;
use tracing::warn;

use crate::layer::{ChangeKind, ChangeRecord, Layer};
use crate::types::{ContentId, FileSystemState};

/// Apply every record of `layer` to `state`.
///
/// Returns the number of malformed records that were skipped.
pub fn apply_layer(state: &mut FileSystemState, layer: &Layer) -> usize {
    let mut skipped = 0;

    for change in layer.changes() {
        match change.kind() {
            ChangeKind::Added | ChangeKind::Modified => match change.new_content_id() {
                Some(content_id) => {
                    state.insert(change.path().to_string(), content_id.to_string());
                }
                None => {
                    warn!(
                        layer = %layer.name(),
                        path = %change.path(),
                        kind = %change.kind(),
                        "Skipping change record without content id"
                    );
                    skipped += 1;
                }
            },
            ChangeKind::Removed => {
                state.remove(change.path());
            }
            ChangeKind::PermissionChanged => {}
        }
    }

    skipped
}

/// Fold `layers` on top of `state`, in order.
pub fn fold_layers<'a, I>(state: &mut FileSystemState, layers: I) -> usize
where
    I: IntoIterator<Item = &'a Layer>,
{
    layers.into_iter().map(|layer| apply_layer(state, layer)).sum()
}

/// Effective state of one path in a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FileState {
    /// Path exists with content written by `layer` of plan `plan`.
    Exists { content_id: ContentId, plan: String, layer: String },
    /// Last effective record for the path removed it.
    Removed { plan: String, layer: String },
    /// No layer in the chain ever wrote the path.
    NotFound,
}

impl FileState {
    pub fn exists(&self) -> bool {
        matches!(self, FileState::Exists { .. })
    }

    pub fn content_id(&self) -> Option<&str> {
        match self {
            FileState::Exists { content_id, .. } => Some(content_id),
            _ => None,
        }
    }
}

/// Classify the record that decides a path's state, scanning newest first.
///
/// Records that do not affect the mapping (permission changes, writes
/// without content) are passed over.
pub(crate) fn decisive_state(record: &ChangeRecord, plan: &str, layer: &str) -> Option<FileState> {
    match record.kind() {
        ChangeKind::Added | ChangeKind::Modified => {
            record.new_content_id().map(|content_id| FileState::Exists {
                content_id: content_id.to_string(),
                plan: plan.to_string(),
                layer: layer.to_string(),
            })
        }
        ChangeKind::Removed => {
            Some(FileState::Removed { plan: plan.to_string(), layer: layer.to_string() })
        }
        ChangeKind::PermissionChanged => None,
    }
}

/// One record touching a path, as seen in a plan's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileVersion {
    pub plan: String,
    pub layer: String,
    pub record: ChangeRecord,
}
