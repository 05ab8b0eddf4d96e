//! Execution of materialized plans.
//!
//! The engine only dispatches; strategies decide how a plan runs.

mod engine;
mod error;
mod strategy;

pub use engine::ExecutionEngine;
pub use error::{ExecError, ExecResult};
#[cfg(any(test, feature = "mockall"))]
pub use strategy::MockExecutionStrategy;
pub use strategy::{ExecutionReport, ExecutionStrategy, WasmStrategy};
