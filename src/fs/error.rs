use thiserror::Error;

pub type PathResult<T> = Result<T, PathError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Invalid path: empty")]
    Empty,

    #[error("Invalid path: contains NUL character")]
    ContainsNul,

    #[error("Invalid path: must start with / ({0})")]
    NotAbsolute(String),

    #[error("Invalid path: relative component in {0}")]
    RelativeComponent(String),

    #[error("Path too long: {0} bytes (max 4096)")]
    PathTooLong(usize),

    #[error("Path component too long: {0} bytes (max 255)")]
    ComponentTooLong(usize),
}
