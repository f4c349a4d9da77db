//! Exact inference for discrete Bayesian networks.
//!
//! Build [`Variable`]s with validated CPTs, register them in a [`Network`],
//! clamp evidence, and query marginals or the most probable explanation:
//!
//! ```
//! use bn_core::sprinkler::sprinkler_network;
//!
//! let mut net = sprinkler_network().unwrap();
//! net.clamp_variable("rain", 0).unwrap();
//! let table = net.joint_probability().unwrap();
//! assert!((table.get("cloudy").unwrap()[0] - 0.8).abs() < 1e-12);
//! ```

pub mod cli;
pub mod exit_codes;
pub mod inference;
pub mod model;
pub mod sprinkler;

pub use bn_common::{Error, InferenceKind, Result, VariableId};
pub use inference::{Explanation, JointTable};
pub use model::{Network, Variable};
