use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub plans: PlanConfig,
    pub cache: CacheConfig,
    pub execution: ExecutionConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    /// Reject Added/Modified records without a content id instead of skipping them.
    pub strict_changes: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    pub max_entries: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    pub entry_point: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true, max_entries: 1024 }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self { entry_point: "/main.wasm".to_string() }
    }
}

impl Config {
    /// Load `layerplan.{toml,json,...}` from the working directory, then
    /// `LAYERPLAN__SECTION__KEY` environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        Self::build(config::File::with_name("layerplan").required(false))
    }

    /// Same as [`Config::load`] but reads the given file, which must exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        Self::build(config::File::from(path).required(true))
            .with_context(|| format!("failed to load config from {}", path.display()))
    }

    fn build<S>(file: S) -> anyhow::Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix("LAYERPLAN").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
