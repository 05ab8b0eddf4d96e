//! Layer data model.
//!
//! A [`Layer`] is a named batch of [`ChangeRecord`]s. Layers are immutable
//! once appended to a plan; new changes always go into a new layer.

mod change;
mod definition;

pub use change::{ChangeKind, ChangeRecord};
pub use definition::Layer;
