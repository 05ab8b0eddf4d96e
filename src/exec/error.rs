use thiserror::Error;

pub type ExecResult<T> = Result<T, ExecError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    #[error("No execution strategy has been set")]
    NoStrategy,

    #[error("Entry point '{entry_point}' not found in plan '{plan}'")]
    EntryPointMissing { plan: String, entry_point: String },
}
