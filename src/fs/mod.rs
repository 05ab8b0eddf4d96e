pub mod error;
pub mod path;

pub use error::{PathError, PathResult};
pub use path::normalize_path;
