use tracing::debug;

use super::error::{ExecError, ExecResult};
use super::strategy::{ExecutionReport, ExecutionStrategy};
use crate::types::FileSystemState;

/// Runs plans through whichever strategy is currently selected.
#[derive(Default)]
pub struct ExecutionEngine {
    strategy: Option<Box<dyn ExecutionStrategy>>,
}

impl ExecutionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(strategy: Box<dyn ExecutionStrategy>) -> Self {
        Self { strategy: Some(strategy) }
    }

    pub fn set_strategy(&mut self, strategy: Box<dyn ExecutionStrategy>) {
        self.strategy = Some(strategy);
    }

    pub fn has_strategy(&self) -> bool {
        self.strategy.is_some()
    }

    pub async fn run(&self, plan: &str, state: &FileSystemState) -> ExecResult<ExecutionReport> {
        let strategy = self.strategy.as_ref().ok_or(ExecError::NoStrategy)?;
        debug!(plan = %plan, strategy = %strategy.name(), "Dispatching plan");
        strategy.execute(plan, state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::strategy::MockExecutionStrategy;
    use chrono::Utc;

    #[tokio::test]
    async fn test_run_without_strategy() {
        let engine = ExecutionEngine::new();
        assert!(!engine.has_strategy());

        let err = engine.run("p", &FileSystemState::new()).await.unwrap_err();
        assert_eq!(err, ExecError::NoStrategy);
    }

    #[tokio::test]
    async fn test_run_delegates_to_strategy() {
        let mut mock = MockExecutionStrategy::new();
        mock.expect_name().returning(|| "mock".to_string());
        mock.expect_execute().times(1).returning(|plan, state| {
            Ok(ExecutionReport {
                plan: plan.to_string(),
                strategy: "mock".to_string(),
                entry_point: "/bin/app".to_string(),
                entry_content_id: "h".to_string(),
                file_count: state.len(),
                started_at: Utc::now(),
                finished_at: Utc::now(),
            })
        });

        let mut engine = ExecutionEngine::new();
        engine.set_strategy(Box::new(mock));

        let mut fs = FileSystemState::new();
        fs.insert("/bin/app".to_string(), "h".to_string());
        let report = engine.run("p", &fs).await.unwrap();
        assert_eq!(report.plan, "p");
        assert_eq!(report.file_count, 1);
    }

    #[tokio::test]
    async fn test_run_propagates_strategy_error() {
        let mut mock = MockExecutionStrategy::new();
        mock.expect_name().returning(|| "mock".to_string());
        mock.expect_execute().returning(|plan, _| {
            Err(ExecError::EntryPointMissing {
                plan: plan.to_string(),
                entry_point: "/main.wasm".to_string(),
            })
        });

        let engine = ExecutionEngine::with_strategy(Box::new(mock));
        let err = engine.run("p", &FileSystemState::new()).await.unwrap_err();
        assert!(matches!(err, ExecError::EntryPointMissing { .. }));
    }
}
