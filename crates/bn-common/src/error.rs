//! Error types for the Bayesian network engine.

use thiserror::Error;

use crate::inference::InferenceKind;

/// Result type alias for Bayesian network operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the Bayesian network engine.
#[derive(Error, Debug)]
pub enum Error {
    // CPT errors (10-19)
    #[error("invalid CPT for variable '{variable}': {defect}")]
    InvalidCpt { variable: String, defect: CptDefect },

    #[error("invalid variable '{name}': {reason}")]
    InvalidVariable { name: String, reason: String },

    // Lookup errors (20-29)
    #[error("variable '{0}' not found")]
    NotFound(String),

    #[error("variable id {0} not found")]
    IdNotFound(usize),

    // Graph errors (30-39)
    #[error("malformed graph: {0}")]
    MalformedGraph(GraphDefect),

    // Evidence errors (40-49)
    #[error("state {state} is out of range for variable '{variable}' ({num_states} states)")]
    InvalidEvidence {
        variable: String,
        state: usize,
        num_states: usize,
    },

    #[error("evidence has zero probability under the model (at variable '{variable}')")]
    InconsistentEvidence { variable: String },

    #[error("assignment covers {given} of {expected} variables")]
    IncompleteAssignment { given: usize, expected: usize },

    // Inference errors (50-59)
    #[error("inference mode '{0}' is not supported")]
    UnsupportedInference(InferenceKind),

    #[error("distribution for variable '{0}' is empty")]
    EmptyDistribution(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors (70-79)
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidCpt { .. } => 10,
            Error::InvalidVariable { .. } => 11,
            Error::NotFound(_) => 20,
            Error::IdNotFound(_) => 21,
            Error::MalformedGraph(_) => 30,
            Error::InvalidEvidence { .. } => 40,
            Error::InconsistentEvidence { .. } => 41,
            Error::IncompleteAssignment { .. } => 42,
            Error::UnsupportedInference(_) => 50,
            Error::EmptyDistribution(_) => 51,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
            Error::Config(_) => 70,
        }
    }
}

/// Ways a conditional probability table can be malformed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CptDefect {
    #[error("table is empty")]
    Empty,

    #[error("no table has been assigned")]
    Missing,

    #[error("row {row} has {actual} entries, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("row {row} sums to {sum}, outside ({lower}, 1]")]
    RowSum { row: usize, sum: f64, lower: f64 },

    #[error("row {row} holds a negative or non-finite entry")]
    BadEntry { row: usize },

    #[error("table has {actual} rows, parents require {expected}")]
    RowCount { expected: usize, actual: usize },
}

/// Ways a parent graph can be malformed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphDefect {
    #[error("cycle through variable '{0}'")]
    Cycle(String),

    #[error("duplicate variable name '{0}'")]
    DuplicateName(String),

    #[error("variable '{child}' lists parent '{parent}' more than once")]
    DuplicateParent { child: String, parent: String },

    #[error("variable '{child}' expects parent '{parent}' with {expected} states, registered one has {actual}")]
    CardinalityMismatch {
        child: String,
        parent: String,
        expected: usize,
        actual: usize,
    },
}
