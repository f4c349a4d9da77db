//! Bayesian network common types, IDs, and errors.
//!
//! This crate provides foundational types shared across bn-core modules:
//! - Variable identity types
//! - Inference mode selection
//! - Common error types
//! - Output format selection

pub mod error;
pub mod id;
pub mod inference;
pub mod output;
pub mod schema;

pub use error::{CptDefect, Error, GraphDefect, Result};
pub use id::VariableId;
pub use inference::InferenceKind;
pub use output::OutputFormat;
pub use schema::SCHEMA_VERSION;
