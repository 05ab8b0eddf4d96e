//! Plans: versioned filesystem states built from a parent plus layers.
//!
//! - [`PlanStore`]: arena with create, apply, clone, merge, materialize
//! - [`PlanBuilder`]: seal a plan together with its layers
//! - [`diff_states`]: compare two materialized states

mod builder;
mod diff;
mod error;
mod materialize;
mod store;

pub use builder::PlanBuilder;
pub use diff::{DiffKind, PathChange, diff_states};
pub use error::{FreezeReason, PlanError, PlanResult};
pub use materialize::{FileState, FileVersion, apply_layer, fold_layers};
pub use store::{PlanInfo, PlanStore};
