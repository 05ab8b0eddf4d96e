//! Layered, versioned virtual filesystem plans.
//!
//! A plan is an optional parent plan plus an ordered list of layers, each
//! a batch of path-level changes. Plans branch in constant time, merge when
//! they share a parent, and materialize into a path -> content mapping.

pub mod config;
pub mod exec;
pub mod fs;
pub mod layer;
pub mod manager;
pub mod manifest;
pub mod plan;
pub mod types;

pub use config::Config;
pub use layer::{ChangeKind, ChangeRecord, Layer};
pub use manager::{ManagerError, PlanManager};
pub use plan::{PlanBuilder, PlanError, PlanStore};
pub use types::{ContentId, FileSystemState, PlanHandle};
