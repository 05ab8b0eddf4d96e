//! Declarative plan descriptions (TOML or JSON).
//!
//! ```toml
//! [template]
//! layers = [{ name = "os", changes = [{ path = "/etc/os", kind = "added", content = "h0" }] }]
//!
//! [[plans]]
//! name = "web"
//!
//! [[plans.layers]]
//! name = "cfg"
//! changes = [{ path = "/etc/nginx.conf", kind = "added", content = "h1" }]
//!
//! [[plans]]
//! name = "web-test"
//! clone_of = "web"
//! ```
//!
//! Plans are built in declaration order; `clone_of` and `merge_of` may only
//! name plans declared earlier.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::Config;
use crate::layer::{ChangeKind, ChangeRecord, Layer};
use crate::manager::PlanManager;
use crate::types::ContentId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanManifest {
    #[serde(default)]
    pub template: Option<TemplateEntry>,
    #[serde(default)]
    pub plans: Vec<PlanEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateEntry {
    #[serde(default)]
    pub layers: Vec<LayerEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanEntry {
    pub name: String,
    #[serde(default)]
    pub clone_of: Option<String>,
    #[serde(default)]
    pub merge_of: Option<(String, String)>,
    #[serde(default)]
    pub layers: Vec<LayerEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerEntry {
    pub name: String,
    #[serde(default)]
    pub changes: Vec<ChangeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEntry {
    pub path: String,
    pub kind: ChangeKind,
    #[serde(default)]
    pub content: Option<ContentId>,
    #[serde(default)]
    pub previous: Option<ContentId>,
}

impl LayerEntry {
    pub fn to_layer(&self) -> Result<Layer> {
        let changes = self
            .changes
            .iter()
            .map(|change| {
                ChangeRecord::new(
                    &change.path,
                    change.kind,
                    change.content.clone(),
                    change.previous.clone(),
                )
                .with_context(|| format!("invalid change in layer '{}'", self.name))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Layer::from_changes(self.name.clone(), changes))
    }
}

fn to_layers(specs: &[LayerEntry]) -> Result<Vec<Layer>> {
    specs.iter().map(LayerEntry::to_layer).collect()
}

impl PlanManifest {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        toml::from_str(input).context("failed to parse TOML manifest")
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("failed to parse JSON manifest")
    }

    /// Read a manifest, choosing the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let input = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&input),
            _ => Self::from_toml_str(&input),
        }
    }

    /// Build every declared plan into a fresh registry.
    pub fn build(&self, config: &Config) -> Result<PlanManager> {
        let manager = match &self.template {
            Some(template) => PlanManager::with_template(config, to_layers(&template.layers)?)?,
            None => PlanManager::new(config),
        };

        for plan in &self.plans {
            let created = match (&plan.clone_of, &plan.merge_of) {
                (Some(_), Some(_)) => {
                    bail!("plan '{}' cannot set both clone_of and merge_of", plan.name)
                }
                (Some(source), None) => manager.clone_plan(source, &plan.name),
                (None, Some((left, right))) => manager.merge_plans(&plan.name, left, right),
                (None, None) => manager.create_plan(&plan.name),
            };
            created.with_context(|| format!("failed to build plan '{}'", plan.name))?;

            for layer in to_layers(&plan.layers)? {
                manager
                    .apply_layer(&plan.name, layer)
                    .with_context(|| format!("failed to apply layer to plan '{}'", plan.name))?;
            }
        }

        Ok(manager)
    }
}
