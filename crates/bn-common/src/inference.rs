//! Inference mode selection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inference algorithm requested by a caller.
///
/// Only [`InferenceKind::FullJoint`] is implemented; the other modes exist so
/// that a request for them fails with a typed error instead of being answered
/// by a different algorithm.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum InferenceKind {
    /// Forward propagation over the whole network.
    #[default]
    FullJoint,
    VariableElimination,
    JunctionTree,
    Sampling,
}

impl InferenceKind {
    pub fn is_supported(self) -> bool {
        matches!(self, InferenceKind::FullJoint)
    }
}

impl fmt::Display for InferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceKind::FullJoint => write!(f, "full_joint"),
            InferenceKind::VariableElimination => write!(f, "variable_elimination"),
            InferenceKind::JunctionTree => write!(f, "junction_tree"),
            InferenceKind::Sampling => write!(f, "sampling"),
        }
    }
}
