use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(any(test, feature = "mockall"))]
use mockall::automock;
use serde::Serialize;
use tracing::{error, info};

use super::error::{ExecError, ExecResult};
use crate::config::ExecutionConfig;
use crate::types::{ContentId, FileSystemState};

/// Outcome of running a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    pub plan: String,
    pub strategy: String,
    pub entry_point: String,
    pub entry_content_id: ContentId,
    pub file_count: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// A way of running code inside a plan's materialized filesystem.
///
/// Strategies receive the mapping read-only and treat it as the root of
/// the sandbox filesystem.
#[cfg_attr(any(test, feature = "mockall"), automock)]
#[async_trait]
pub trait ExecutionStrategy: Send + Sync {
    fn name(&self) -> String;

    async fn execute(&self, plan: &str, state: &FileSystemState) -> ExecResult<ExecutionReport>;
}

/// WebAssembly strategy: resolves the entry module inside the plan.
///
/// Content ids are opaque here, so no module bytes are loaded; the report
/// names the content the runtime would be handed.
#[derive(Debug, Clone)]
pub struct WasmStrategy {
    entry_point: String,
}

impl WasmStrategy {
    pub fn new(entry_point: impl Into<String>) -> Self {
        Self { entry_point: entry_point.into() }
    }

    pub fn from_config(config: &ExecutionConfig) -> Self {
        Self::new(config.entry_point.clone())
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }
}

impl Default for WasmStrategy {
    fn default() -> Self {
        Self::from_config(&ExecutionConfig::default())
    }
}

#[async_trait]
impl ExecutionStrategy for WasmStrategy {
    fn name(&self) -> String {
        "wasm".to_string()
    }

    async fn execute(&self, plan: &str, state: &FileSystemState) -> ExecResult<ExecutionReport> {
        let started_at = Utc::now();

        let Some(content_id) = state.get(&self.entry_point) else {
            error!(plan = %plan, entry_point = %self.entry_point, "Entry point not found");
            return Err(ExecError::EntryPointMissing {
                plan: plan.to_string(),
                entry_point: self.entry_point.clone(),
            });
        };

        info!(
            plan = %plan,
            entry_point = %self.entry_point,
            content_id = %content_id,
            files = state.len(),
            "Running wasm entry point"
        );

        Ok(ExecutionReport {
            plan: plan.to_string(),
            strategy: self.name(),
            entry_point: self.entry_point.clone(),
            entry_content_id: content_id.clone(),
            file_count: state.len(),
            started_at,
            finished_at: Utc::now(),
        })
    }
}
