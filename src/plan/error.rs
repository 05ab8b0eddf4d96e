use std::fmt;
use thiserror::Error;

use crate::fs::PathError;
use crate::layer::ChangeKind;
use crate::types::PlanHandle;

/// Why a plan no longer accepts new layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreezeReason {
    /// Other plans hold it as their parent.
    HasChildren,
    /// Its layers were folded into a merged plan.
    MergedFrom,
}

impl fmt::Display for FreezeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FreezeReason::HasChildren => write!(f, "plan has children"),
            FreezeReason::MergedFrom => write!(f, "plan has been merged from"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Plan not found: {0}")]
    UnknownPlan(PlanHandle),

    #[error("Plan '{0}' has no outstanding holds to release")]
    NotHeld(String),

    #[error("Incompatible merge: plans '{left}' and '{right}' do not share the same parent")]
    IncompatibleMerge { left: String, right: String },

    #[error("Cannot apply layer to frozen plan '{plan}': {reason}")]
    FrozenPlan { plan: String, reason: FreezeReason },

    #[error("Malformed change in layer '{layer}': {kind} record for {path} has no content id")]
    MalformedChange { layer: String, path: String, kind: ChangeKind },

    #[error(transparent)]
    InvalidPath(#[from] PathError),
}

pub type PlanResult<T> = Result<T, PlanError>;
