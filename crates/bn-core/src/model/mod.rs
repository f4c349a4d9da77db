//! Network model: variables, CPTs, and the network container.

pub mod network;
pub mod variable;

pub use network::Network;
pub use variable::{Cpt, ParentRef, Variable};
