//! Plan registry.
//!
//! Owns the set of live plans by name plus an optional initial-state
//! template that new plans start from. All mutations go through a single
//! lock, which serialises appends against clones and merges.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::layer::Layer;
use crate::plan::{
    FileState, FileVersion, PathChange, PlanBuilder, PlanError, PlanInfo, PlanStore, diff_states,
};
use crate::types::{FileSystemState, PlanHandle};

const TEMPLATE_ID: &str = "initial-state";

#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("Plan not found: {0}")]
    PlanNotFound(String),

    #[error("Plan already exists: {0}")]
    PlanAlreadyExists(String),

    #[error(transparent)]
    Plan(#[from] PlanError),
}

pub type ManagerResult<T> = Result<T, ManagerError>;

#[derive(Debug)]
struct Registry {
    store: PlanStore,
    names: HashMap<String, PlanHandle>,
    template: Option<PlanHandle>,
}

impl Registry {
    fn handle(&self, name: &str) -> ManagerResult<PlanHandle> {
        self.names.get(name).copied().ok_or_else(|| ManagerError::PlanNotFound(name.to_string()))
    }

    fn ensure_free(&self, name: &str) -> ManagerResult<()> {
        if self.names.contains_key(name) {
            return Err(ManagerError::PlanAlreadyExists(name.to_string()));
        }
        Ok(())
    }
}

/// Named plans over a shared [`PlanStore`].
#[derive(Debug)]
pub struct PlanManager {
    inner: RwLock<Registry>,
}

impl PlanManager {
    pub fn new(config: &Config) -> Self {
        let registry = Registry {
            store: PlanStore::with_config(config),
            names: HashMap::new(),
            template: None,
        };
        Self { inner: RwLock::new(registry) }
    }

    /// Registry whose plans all start from a sealed template.
    ///
    /// Every created plan shares the template as parent, so any two of
    /// them can be merged.
    pub fn with_template(config: &Config, layers: Vec<Layer>) -> ManagerResult<Self> {
        let manager = Self::new(config);
        {
            let mut registry = manager.write();
            let template = PlanBuilder::new(TEMPLATE_ID).layers(layers).seal(&mut registry.store)?;
            info!(plan = %template, "Registered initial-state template");
            registry.template = Some(template);
        }
        Ok(manager)
    }

    fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn template(&self) -> Option<PlanHandle> {
        self.read().template
    }

    /// Create a fresh plan on the template, or as a root without one.
    pub fn create_plan(&self, name: &str) -> ManagerResult<PlanHandle> {
        let mut registry = self.write();
        registry.ensure_free(name)?;

        let parent = registry.template;
        let handle = registry.store.create(name, parent)?;
        registry.names.insert(name.to_string(), handle);
        Ok(handle)
    }

    pub fn get(&self, name: &str) -> Option<PlanHandle> {
        self.read().names.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().names.contains_key(name)
    }

    pub fn apply_layer(&self, name: &str, layer: Layer) -> ManagerResult<()> {
        let mut registry = self.write();
        let handle = registry.handle(name)?;
        registry.store.apply_layer(handle, layer)?;
        Ok(())
    }

    pub fn clone_plan(&self, source: &str, new_name: &str) -> ManagerResult<PlanHandle> {
        let mut registry = self.write();
        registry.ensure_free(new_name)?;

        let source = registry.handle(source)?;
        let handle = registry.store.clone_plan(source, new_name)?;
        registry.names.insert(new_name.to_string(), handle);
        Ok(handle)
    }

    pub fn merge_plans(
        &self,
        new_name: &str,
        left: &str,
        right: &str,
    ) -> ManagerResult<PlanHandle> {
        let mut registry = self.write();
        registry.ensure_free(new_name)?;

        let (left, right) = (registry.handle(left)?, registry.handle(right)?);
        let handle = registry.store.merge(new_name, left, right)?;
        registry.names.insert(new_name.to_string(), handle);
        Ok(handle)
    }

    pub fn materialize(&self, name: &str) -> ManagerResult<Arc<FileSystemState>> {
        let registry = self.read();
        let handle = registry.handle(name)?;
        Ok(registry.store.materialize(handle)?)
    }

    pub fn lookup(&self, name: &str, path: &str) -> ManagerResult<FileState> {
        let registry = self.read();
        let handle = registry.handle(name)?;
        Ok(registry.store.lookup(handle, path)?)
    }

    pub fn file_history(&self, name: &str, path: &str) -> ManagerResult<Vec<FileVersion>> {
        let registry = self.read();
        let handle = registry.handle(name)?;
        Ok(registry.store.file_history(handle, path)?)
    }

    /// Path changes that turn plan `from` into plan `to`.
    pub fn diff(&self, from: &str, to: &str) -> ManagerResult<Vec<PathChange>> {
        let registry = self.read();
        let from = registry.store.materialize(registry.handle(from)?)?;
        let to = registry.store.materialize(registry.handle(to)?)?;
        Ok(diff_states(&from, &to))
    }

    pub fn plan_info(&self, name: &str) -> ManagerResult<PlanInfo> {
        let registry = self.read();
        let handle = registry.handle(name)?;
        Ok(registry.store.info(handle)?)
    }

    /// Registered plans, sorted by name.
    pub fn list_plans(&self) -> ManagerResult<Vec<PlanInfo>> {
        let registry = self.read();
        let mut plans = registry
            .names
            .values()
            .map(|handle| registry.store.info(*handle))
            .collect::<Result<Vec<_>, _>>()?;
        plans.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(plans)
    }

    /// Drop the registry's hold on a plan.
    ///
    /// The plan stays reachable through its clones until they are removed
    /// too. Returns the number of plans freed.
    pub fn remove_plan(&self, name: &str) -> ManagerResult<usize> {
        let mut registry = self.write();
        let handle = registry.handle(name)?;
        let freed = registry.store.release(handle)?;
        registry.names.remove(name);

        info!(plan = %handle, name = %name, freed, "Removed plan from registry");
        Ok(freed)
    }

    /// Number of plans alive in the store, including the template and
    /// unnamed ancestors kept alive by their children.
    pub fn live_plans(&self) -> usize {
        self.read().store.len()
    }
}

impl Default for PlanManager {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
