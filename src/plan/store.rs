//! Plan arena.
//!
//! Plans are addressed by [`PlanHandle`] and store their parent as a handle,
//! so cloning never needs a reference to "self". Layers are shared as
//! `Arc<Layer>`: a clone copies nothing and a merge copies only pointers.
//!
//! A plan stays alive while it has holders: direct children plus external
//! holds taken with [`PlanStore::retain`]. Releasing the last holder removes
//! the plan and walks up the chain releasing parents that became unheld.

use chrono::{DateTime, Utc};
use moka::sync::Cache;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::error::{FreezeReason, PlanError, PlanResult};
use super::materialize::{FileState, FileVersion, decisive_state, fold_layers};
use crate::config::Config;
use crate::fs::normalize_path;
use crate::layer::Layer;
use crate::types::{FileSystemState, PlanHandle};

#[derive(Debug)]
struct PlanNode {
    id: String,
    parent: Option<PlanHandle>,
    layers: Vec<Arc<Layer>>,
    children: usize,
    holds: usize,
    merged_from: bool,
    created_at: DateTime<Utc>,
}

impl PlanNode {
    fn new(id: String, parent: Option<PlanHandle>, layers: Vec<Arc<Layer>>) -> Self {
        Self {
            id,
            parent,
            layers,
            children: 0,
            holds: 1,
            merged_from: false,
            created_at: Utc::now(),
        }
    }

    fn freeze_reason(&self) -> Option<FreezeReason> {
        if self.merged_from {
            Some(FreezeReason::MergedFrom)
        } else if self.children > 0 {
            Some(FreezeReason::HasChildren)
        } else {
            None
        }
    }
}

/// Summary of a plan, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanInfo {
    pub handle: PlanHandle,
    pub id: String,
    pub parent: Option<PlanHandle>,
    pub layer_count: usize,
    pub depth: usize,
    pub frozen: bool,
    pub created_at: DateTime<Utc>,
}

/// Arena owning every live plan.
#[derive(Debug)]
pub struct PlanStore {
    nodes: HashMap<PlanHandle, PlanNode>,
    cache: Option<Cache<PlanHandle, Arc<FileSystemState>>>,
    strict_changes: bool,
}

impl PlanStore {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        let cache = config.cache.enabled.then(|| Cache::new(config.cache.max_entries));
        Self { nodes: HashMap::new(), cache, strict_changes: config.plans.strict_changes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, handle: PlanHandle) -> bool {
        self.nodes.contains_key(&handle)
    }

    fn node(&self, handle: PlanHandle) -> PlanResult<&PlanNode> {
        self.nodes.get(&handle).ok_or(PlanError::UnknownPlan(handle))
    }

    fn node_mut(&mut self, handle: PlanHandle) -> PlanResult<&mut PlanNode> {
        self.nodes.get_mut(&handle).ok_or(PlanError::UnknownPlan(handle))
    }

    /// Create an empty plan, optionally on top of `parent`.
    ///
    /// The parent must already live in this store, so no plan can become
    /// its own ancestor. The returned handle carries one external hold.
    pub fn create(
        &mut self,
        id: impl Into<String>,
        parent: Option<PlanHandle>,
    ) -> PlanResult<PlanHandle> {
        self.insert(id.into(), parent, Vec::new())
    }

    pub(crate) fn insert(
        &mut self,
        id: String,
        parent: Option<PlanHandle>,
        layers: Vec<Arc<Layer>>,
    ) -> PlanResult<PlanHandle> {
        if let Some(parent) = parent {
            self.node_mut(parent)?.children += 1;
        }

        let handle = PlanHandle::new();
        info!(plan = %handle, id = %id, parent = ?parent, layers = layers.len(), "Created plan");
        self.nodes.insert(handle, PlanNode::new(id, parent, layers));

        Ok(handle)
    }

    pub(crate) fn check_layer(&self, layer: &Layer) -> PlanResult<()> {
        if !self.strict_changes {
            return Ok(());
        }
        match layer.malformed_records().next() {
            Some(record) => Err(PlanError::MalformedChange {
                layer: layer.name().to_string(),
                path: record.path().to_string(),
                kind: record.kind(),
            }),
            None => Ok(()),
        }
    }

    /// Append `layer` to the end of the plan's layer sequence.
    ///
    /// Rejected once the plan has children or has been merged from.
    pub fn apply_layer(&mut self, handle: PlanHandle, layer: Layer) -> PlanResult<()> {
        self.check_layer(&layer)?;

        let node = self.node_mut(handle)?;
        if let Some(reason) = node.freeze_reason() {
            warn!(plan = %handle, id = %node.id, %reason, "Rejected layer on frozen plan");
            return Err(PlanError::FrozenPlan { plan: node.id.clone(), reason });
        }

        debug!(plan = %handle, layer = %layer.name(), changes = layer.len(), "Applying layer");
        node.layers.push(Arc::new(layer));

        if let Some(cache) = &self.cache {
            cache.invalidate(&handle);
        }
        Ok(())
    }

    /// Branch a new, empty plan on top of `source`.
    ///
    /// Constant time: nothing of the source chain is copied. `source` is
    /// frozen for appends while the clone holds it.
    pub fn clone_plan(
        &mut self,
        source: PlanHandle,
        new_id: impl Into<String>,
    ) -> PlanResult<PlanHandle> {
        let new_id = new_id.into();
        let source_id = self.node(source)?.id.clone();
        let handle = self.insert(new_id, Some(source), Vec::new())?;

        info!(source = %source_id, clone = %handle, "Cloned plan");
        Ok(handle)
    }

    /// Combine two plans that share the same parent.
    ///
    /// The merged plan sits on that parent and carries every layer of
    /// `left` followed by every layer of `right`, so `right` wins on any
    /// path both touch. Both sources are frozen afterwards.
    pub fn merge(
        &mut self,
        new_id: impl Into<String>,
        left: PlanHandle,
        right: PlanHandle,
    ) -> PlanResult<PlanHandle> {
        let (left_node, right_node) = (self.node(left)?, self.node(right)?);

        if left_node.parent != right_node.parent {
            warn!(
                left = %left_node.id,
                right = %right_node.id,
                "Refusing merge of unrelated plans"
            );
            return Err(PlanError::IncompatibleMerge {
                left: left_node.id.clone(),
                right: right_node.id.clone(),
            });
        }

        let parent = left_node.parent;
        let layers: Vec<Arc<Layer>> =
            left_node.layers.iter().chain(right_node.layers.iter()).cloned().collect();
        let (left_id, right_id) = (left_node.id.clone(), right_node.id.clone());

        let handle = self.insert(new_id.into(), parent, layers)?;
        self.node_mut(left)?.merged_from = true;
        self.node_mut(right)?.merged_from = true;

        info!(left = %left_id, right = %right_id, merged = %handle, "Merged plans");
        Ok(handle)
    }

    /// Effective path -> content mapping of the plan.
    ///
    /// Walks up to the nearest cached ancestor (or the root), then folds
    /// forward. Ancestors cannot change while they have children, so their
    /// cached states stay valid.
    pub fn materialize(&self, handle: PlanHandle) -> PlanResult<Arc<FileSystemState>> {
        let mut pending = Vec::new();
        let mut base = None;
        let mut cursor = Some(handle);

        while let Some(current) = cursor {
            if let Some(state) = self.cache.as_ref().and_then(|cache| cache.get(&current)) {
                debug!(plan = %current, "Materialization cache hit");
                base = Some(state);
                break;
            }
            let node = self.node(current)?;
            pending.push(node);
            cursor = node.parent;
        }

        let mut state = match base {
            Some(state) if pending.is_empty() => return Ok(state),
            Some(state) => (*state).clone(),
            None => FileSystemState::new(),
        };
        for node in pending.iter().rev() {
            fold_layers(&mut state, node.layers.iter().map(Arc::as_ref));
        }

        let state = Arc::new(state);
        if let Some(cache) = &self.cache {
            cache.insert(handle, Arc::clone(&state));
        }
        Ok(state)
    }

    /// Take an additional external hold on the plan.
    pub fn retain(&mut self, handle: PlanHandle) -> PlanResult<()> {
        self.node_mut(handle)?.holds += 1;
        Ok(())
    }

    /// Drop one external hold.
    ///
    /// Returns how many plans were freed: the plan itself if nothing else
    /// holds it, plus every ancestor left without holders.
    pub fn release(&mut self, handle: PlanHandle) -> PlanResult<usize> {
        let node = self.node_mut(handle)?;
        if node.holds == 0 {
            return Err(PlanError::NotHeld(node.id.clone()));
        }
        node.holds -= 1;

        let mut freed = 0;
        let mut cursor = Some(handle);
        while let Some(current) = cursor {
            let node = self.node(current)?;
            if node.holds > 0 || node.children > 0 {
                break;
            }

            let Some(node) = self.nodes.remove(&current) else { break };
            if let Some(cache) = &self.cache {
                cache.invalidate(&current);
            }
            debug!(plan = %current, id = %node.id, "Freed plan");
            freed += 1;

            cursor = node.parent;
            if let Some(parent) = cursor {
                self.node_mut(parent)?.children -= 1;
            }
        }

        Ok(freed)
    }

    pub fn id(&self, handle: PlanHandle) -> PlanResult<&str> {
        Ok(&self.node(handle)?.id)
    }

    pub fn parent(&self, handle: PlanHandle) -> PlanResult<Option<PlanHandle>> {
        Ok(self.node(handle)?.parent)
    }

    /// Layers owned by this plan, excluding ancestors.
    pub fn layers(&self, handle: PlanHandle) -> PlanResult<&[Arc<Layer>]> {
        Ok(&self.node(handle)?.layers)
    }

    pub fn is_frozen(&self, handle: PlanHandle) -> PlanResult<bool> {
        Ok(self.node(handle)?.freeze_reason().is_some())
    }

    /// Handles from the root down to `handle` inclusive.
    pub fn ancestry(&self, handle: PlanHandle) -> PlanResult<Vec<PlanHandle>> {
        let mut chain = Vec::new();
        let mut cursor = Some(handle);
        while let Some(current) = cursor {
            chain.push(current);
            cursor = self.node(current)?.parent;
        }
        chain.reverse();
        Ok(chain)
    }

    /// Number of ancestors; a root has depth 0.
    pub fn depth(&self, handle: PlanHandle) -> PlanResult<usize> {
        Ok(self.ancestry(handle)?.len() - 1)
    }

    pub fn info(&self, handle: PlanHandle) -> PlanResult<PlanInfo> {
        let node = self.node(handle)?;
        Ok(PlanInfo {
            handle,
            id: node.id.clone(),
            parent: node.parent,
            layer_count: node.layers.len(),
            depth: self.depth(handle)?,
            frozen: node.freeze_reason().is_some(),
            created_at: node.created_at,
        })
    }

    /// State of a single path without materializing the whole plan.
    pub fn lookup(&self, handle: PlanHandle, path: &str) -> PlanResult<FileState> {
        let path = normalize_path(path)?;
        let mut cursor = Some(handle);

        while let Some(current) = cursor {
            let node = self.node(current)?;
            for layer in node.layers.iter().rev() {
                let decided = layer
                    .changes()
                    .iter()
                    .rev()
                    .filter(|record| record.path() == path)
                    .find_map(|record| decisive_state(record, &node.id, layer.name()));
                if let Some(state) = decided {
                    return Ok(state);
                }
            }
            cursor = node.parent;
        }

        Ok(FileState::NotFound)
    }

    /// Every record touching `path`, root first, in application order.
    pub fn file_history(&self, handle: PlanHandle, path: &str) -> PlanResult<Vec<FileVersion>> {
        let path = normalize_path(path)?;
        let mut history = Vec::new();

        for current in self.ancestry(handle)? {
            let node = self.node(current)?;
            for layer in &node.layers {
                history.extend(layer.changes().iter().filter(|r| r.path() == path).map(|record| {
                    FileVersion {
                        plan: node.id.clone(),
                        layer: layer.name().to_string(),
                        record: record.clone(),
                    }
                }));
            }
        }

        Ok(history)
    }
}

impl Default for PlanStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{ChangeKind, ChangeRecord};

    fn layer_with(name: &str, path: &str, content: &str) -> Layer {
        Layer::new(name).with_added(path, content).unwrap()
    }

    fn state(entries: &[(&str, &str)]) -> FileSystemState {
        entries.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_root_materializes_empty() {
        let mut store = PlanStore::new();
        let root = store.create("root", None).unwrap();

        assert!(store.materialize(root).unwrap().is_empty());
        assert_eq!(store.id(root).unwrap(), "root");
        assert_eq!(store.depth(root).unwrap(), 0);
    }

    #[test]
    fn test_clone_scenario() {
        let mut store = PlanStore::new();
        let root = store.create("R", None).unwrap();
        store.apply_layer(root, layer_with("l1", "/a.txt", "h1")).unwrap();
        assert_eq!(*store.materialize(root).unwrap(), state(&[("/a.txt", "h1")]));

        let clone = store.clone_plan(root, "C").unwrap();
        let modify = Layer::new("l2").with_modified("/a.txt", "h2", Some("h1".into())).unwrap();
        store.apply_layer(clone, modify).unwrap();

        assert_eq!(*store.materialize(clone).unwrap(), state(&[("/a.txt", "h2")]));
        assert_eq!(*store.materialize(root).unwrap(), state(&[("/a.txt", "h1")]));
    }

    #[test]
    fn test_clone_is_empty_and_parented() {
        let mut store = PlanStore::new();
        let root = store.create("R", None).unwrap();
        store.apply_layer(root, layer_with("l1", "/a", "1")).unwrap();

        let clone = store.clone_plan(root, "C").unwrap();
        assert_eq!(store.parent(clone).unwrap(), Some(root));
        assert!(store.layers(clone).unwrap().is_empty());
        assert_eq!(store.materialize(clone).unwrap(), store.materialize(root).unwrap());
    }

    #[test]
    fn test_apply_layer_rejected_after_clone() {
        let mut store = PlanStore::new();
        let root = store.create("R", None).unwrap();
        let _clone = store.clone_plan(root, "C").unwrap();

        let err = store.apply_layer(root, layer_with("late", "/a", "1")).unwrap_err();
        assert_eq!(
            err,
            PlanError::FrozenPlan { plan: "R".to_string(), reason: FreezeReason::HasChildren }
        );
        assert!(store.is_frozen(root).unwrap());
    }

    #[test]
    fn test_merge_last_write_wins() {
        let mut store = PlanStore::new();
        let root = store.create("R", None).unwrap();
        let a = store.clone_plan(root, "A").unwrap();
        let b = store.clone_plan(root, "B").unwrap();
        store.apply_layer(a, layer_with("la", "/x", "1")).unwrap();
        store.apply_layer(b, layer_with("lb", "/x", "2")).unwrap();

        let merged = store.merge("m", a, b).unwrap();
        assert_eq!(store.materialize(merged).unwrap().get("/x").map(String::as_str), Some("2"));
        assert_eq!(store.parent(merged).unwrap(), Some(root));
        assert_eq!(store.layers(merged).unwrap().len(), 2);
    }

    #[test]
    fn test_merge_shares_layers() {
        let mut store = PlanStore::new();
        let a = store.create("A", None).unwrap();
        let b = store.create("B", None).unwrap();
        store.apply_layer(a, layer_with("la", "/a", "1")).unwrap();
        store.apply_layer(b, layer_with("lb", "/b", "2")).unwrap();

        let merged = store.merge("m", a, b).unwrap();
        let merged_layers = store.layers(merged).unwrap();
        assert!(Arc::ptr_eq(&merged_layers[0], &store.layers(a).unwrap()[0]));
        assert!(Arc::ptr_eq(&merged_layers[1], &store.layers(b).unwrap()[0]));
    }

    #[test]
    fn test_merge_of_roots_is_compatible() {
        let mut store = PlanStore::new();
        let a = store.create("A", None).unwrap();
        let b = store.create("B", None).unwrap();

        let merged = store.merge("m", a, b).unwrap();
        assert_eq!(store.parent(merged).unwrap(), None);
    }

    #[test]
    fn test_merge_incompatible_parents() {
        let mut store = PlanStore::new();
        let root = store.create("R", None).unwrap();
        let a = store.clone_plan(root, "A").unwrap();
        let b = store.create("B", None).unwrap();
        let before = store.len();

        let err = store.merge("m", a, b).unwrap_err();
        assert_eq!(
            err,
            PlanError::IncompatibleMerge { left: "A".to_string(), right: "B".to_string() }
        );
        assert_eq!(store.len(), before);
        assert!(!store.is_frozen(a).unwrap());
    }

    #[test]
    fn test_merge_freezes_sources() {
        let mut store = PlanStore::new();
        let a = store.create("A", None).unwrap();
        let b = store.create("B", None).unwrap();
        let merged = store.merge("m", a, b).unwrap();

        let err = store.apply_layer(a, layer_with("late", "/a", "1")).unwrap_err();
        assert!(matches!(err, PlanError::FrozenPlan { reason: FreezeReason::MergedFrom, .. }));
        assert!(store.apply_layer(merged, layer_with("ok", "/a", "1")).is_ok());
    }

    #[test]
    fn test_removal_round_trip() {
        let mut store = PlanStore::new();
        let root = store.create("R", None).unwrap();
        store.apply_layer(root, layer_with("add", "/p", "h")).unwrap();
        store.apply_layer(root, Layer::new("rm").with_removed("/p").unwrap()).unwrap();

        assert!(!store.materialize(root).unwrap().contains_key("/p"));
        assert!(matches!(store.lookup(root, "/p").unwrap(), FileState::Removed { .. }));
    }

    #[test]
    fn test_cache_invalidated_on_append() {
        let mut store = PlanStore::new();
        let root = store.create("R", None).unwrap();
        store.apply_layer(root, layer_with("l1", "/a", "1")).unwrap();
        let first = store.materialize(root).unwrap();

        store.apply_layer(root, layer_with("l2", "/b", "2")).unwrap();
        let second = store.materialize(root).unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(*second, state(&[("/a", "1"), ("/b", "2")]));
    }

    #[test]
    fn test_materialize_without_cache() {
        let mut config = Config::default();
        config.cache.enabled = false;
        let mut store = PlanStore::with_config(&config);
        let root = store.create("R", None).unwrap();
        store.apply_layer(root, layer_with("l1", "/a", "1")).unwrap();
        let child = store.clone_plan(root, "C").unwrap();

        assert_eq!(store.materialize(child).unwrap(), store.materialize(child).unwrap());
        assert_eq!(*store.materialize(child).unwrap(), state(&[("/a", "1")]));
    }

    #[test]
    fn test_strict_changes_rejects_malformed() {
        let mut config = Config::default();
        config.plans.strict_changes = true;
        let mut store = PlanStore::with_config(&config);
        let root = store.create("R", None).unwrap();

        let bad = Layer::new("bad")
            .with_change(ChangeRecord::new("/a", ChangeKind::Added, None, None).unwrap());
        let err = store.apply_layer(root, bad).unwrap_err();
        assert!(matches!(err, PlanError::MalformedChange { .. }));
        assert!(store.layers(root).unwrap().is_empty());
    }

    #[test]
    fn test_lenient_changes_skip_malformed() {
        let mut store = PlanStore::new();
        let root = store.create("R", None).unwrap();
        let bad = Layer::new("bad")
            .with_change(ChangeRecord::new("/a", ChangeKind::Added, None, None).unwrap());

        store.apply_layer(root, bad).unwrap();
        assert!(store.materialize(root).unwrap().is_empty());
        assert_eq!(store.lookup(root, "/a").unwrap(), FileState::NotFound);
    }

    #[test]
    fn test_deserialized_records_agree_with_lookup() {
        let mut store = PlanStore::new();
        let root = store.create("R", None).unwrap();
        let records: Vec<ChangeRecord> = serde_json::from_str(
            r#"[
                {"path": "//etc//os/", "kind": "added", "new_content_id": "h0"},
                {"path": "/tmp/x", "kind": "added", "new_content_id": "h1"},
                {"path": "/tmp/x/", "kind": "removed", "new_content_id": "ghost"}
            ]"#,
        )
        .unwrap();
        store.apply_layer(root, Layer::from_changes("decoded", records)).unwrap();

        let state = store.materialize(root).unwrap();
        assert_eq!(state.keys().collect::<Vec<_>>(), vec!["/etc/os"]);
        assert_eq!(store.lookup(root, "/etc/os").unwrap().content_id(), Some("h0"));
        assert!(matches!(store.lookup(root, "/tmp/x").unwrap(), FileState::Removed { .. }));
        assert_eq!(store.layers(root).unwrap()[0].changes()[2].new_content_id(), None);
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut store = PlanStore::new();
        let root = store.create("R", None).unwrap();
        store.release(root).unwrap();

        let err = store.create("orphan", Some(root)).unwrap_err();
        assert_eq!(err, PlanError::UnknownPlan(root));
        assert!(store.is_empty());
    }

    #[test]
    fn test_release_frees_unheld_ancestors() {
        let mut store = PlanStore::new();
        let root = store.create("R", None).unwrap();
        let mid = store.clone_plan(root, "M").unwrap();
        let leaf = store.clone_plan(mid, "L").unwrap();

        assert_eq!(store.release(root).unwrap(), 0);
        assert_eq!(store.release(mid).unwrap(), 0);
        assert!(store.contains(root));
        assert_eq!(store.materialize(leaf).unwrap().len(), 0);

        assert_eq!(store.release(leaf).unwrap(), 3);
        assert!(store.is_empty());
    }

    #[test]
    fn test_release_unfreezes_parent() {
        let mut store = PlanStore::new();
        let root = store.create("R", None).unwrap();
        let clone = store.clone_plan(root, "C").unwrap();
        assert!(store.is_frozen(root).unwrap());

        assert_eq!(store.release(clone).unwrap(), 1);
        assert!(!store.is_frozen(root).unwrap());
        assert!(store.apply_layer(root, layer_with("l", "/a", "1")).is_ok());
    }

    #[test]
    fn test_release_without_hold() {
        let mut store = PlanStore::new();
        let root = store.create("R", None).unwrap();
        let _clone = store.clone_plan(root, "C").unwrap();
        store.release(root).unwrap();

        assert_eq!(store.release(root).unwrap_err(), PlanError::NotHeld("R".to_string()));
        store.retain(root).unwrap();
        assert_eq!(store.release(root).unwrap(), 0);
    }

    #[test]
    fn test_ancestry_and_info() {
        let mut store = PlanStore::new();
        let root = store.create("R", None).unwrap();
        let mid = store.clone_plan(root, "M").unwrap();
        let leaf = store.clone_plan(mid, "L").unwrap();

        assert_eq!(store.ancestry(leaf).unwrap(), vec![root, mid, leaf]);
        let info = store.info(leaf).unwrap();
        assert_eq!(info.id, "L");
        assert_eq!(info.depth, 2);
        assert_eq!(info.parent, Some(mid));
        assert!(!info.frozen);
        assert!(store.info(mid).unwrap().frozen);
    }

    #[test]
    fn test_lookup_matches_chain() {
        let mut store = PlanStore::new();
        let root = store.create("R", None).unwrap();
        store.apply_layer(root, layer_with("base", "/etc/os", "h0")).unwrap();
        let child = store.clone_plan(root, "C").unwrap();
        let perm =
            Layer::new("perm").with_change(ChangeRecord::permission_changed("/etc/os").unwrap());
        store.apply_layer(child, perm).unwrap();

        assert_eq!(
            store.lookup(child, "//etc/os").unwrap(),
            FileState::Exists {
                content_id: "h0".to_string(),
                plan: "R".to_string(),
                layer: "base".to_string()
            }
        );
        assert_eq!(store.lookup(child, "/missing").unwrap(), FileState::NotFound);
        assert!(store.lookup(child, "relative").is_err());
    }

    #[test]
    fn test_file_history() {
        let mut store = PlanStore::new();
        let root = store.create("R", None).unwrap();
        store.apply_layer(root, layer_with("add", "/a", "1")).unwrap();
        let child = store.clone_plan(root, "C").unwrap();
        let edit = Layer::new("edit").with_modified("/a", "2", Some("1".into())).unwrap();
        store.apply_layer(child, edit).unwrap();
        store.apply_layer(child, layer_with("other", "/b", "3")).unwrap();

        let history = store.file_history(child, "/a").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!((history[0].plan.as_str(), history[0].layer.as_str()), ("R", "add"));
        assert_eq!((history[1].plan.as_str(), history[1].layer.as_str()), ("C", "edit"));
        assert_eq!(history[1].record.kind(), ChangeKind::Modified);
    }
}
