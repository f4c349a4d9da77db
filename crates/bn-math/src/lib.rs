//! Numerical primitives for discrete Bayesian network inference.

pub mod math;

pub use math::posterior::*;
pub use math::radix::MixedRadix;
pub use math::stable::*;
