use std::sync::Arc;

use super::error::PlanResult;
use super::store::PlanStore;
use crate::layer::Layer;
use crate::types::PlanHandle;

/// Accumulates layers and seals them into a plan in one step.
///
/// A sealed plan never needs `apply_layer`, so it can be shared as a
/// parent straight away.
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    id: String,
    parent: Option<PlanHandle>,
    layers: Vec<Layer>,
}

impl PlanBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), parent: None, layers: Vec::new() }
    }

    pub fn parent(mut self, parent: PlanHandle) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn layer(mut self, layer: Layer) -> Self {
        self.layers.push(layer);
        self
    }

    pub fn layers(mut self, layers: impl IntoIterator<Item = Layer>) -> Self {
        self.layers.extend(layers);
        self
    }

    pub fn seal(self, store: &mut PlanStore) -> PlanResult<PlanHandle> {
        for layer in &self.layers {
            store.check_layer(layer)?;
        }
        store.insert(self.id, self.parent, self.layers.into_iter().map(Arc::new).collect())
    }
}
