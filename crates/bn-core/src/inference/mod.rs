//! Inference engine modules.
//!
//! Data flows one way: the network's variables and evidence are ordered
//! ([`ordering`]), propagated into a [`JointTable`] ([`propagation`]), and
//! reduced to an MPE assignment ([`explain`]).

pub mod assignment;
pub mod explain;
pub mod ordering;
pub mod propagation;

pub use assignment::{assignment_probability, log_assignment_probability};
pub use explain::{most_probable_explanation, ExplainedState, Explanation};
pub use ordering::{topological_order, Ordering};
pub use propagation::{joint_probability, JointTable, Marginal};
