//! Variable identity types.
//!
//! A variable is identified by its insertion index within a network. The id
//! is assigned once at registration and never changes afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Variable ID wrapper with display formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableId(pub usize);

impl VariableId {
    /// Position of the variable in its network's storage.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for VariableId {
    fn from(id: usize) -> Self {
        VariableId(id)
    }
}
