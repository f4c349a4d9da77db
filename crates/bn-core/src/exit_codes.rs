//! Exit codes for the `bayesnet` CLI.
//!
//! Exit codes communicate the failure class without requiring output parsing.

use bn_common::Error;

/// Exit codes for `bayesnet` operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Query answered
    Clean = 0,

    /// Malformed CPT, variable, or graph
    ModelError = 10,

    /// Unknown variable or out-of-range state
    LookupError = 11,

    /// Evidence has zero probability, or the assignment is incomplete
    EvidenceError = 12,

    /// Inference mode unsupported or inference failed
    InferenceError = 13,

    /// Configuration error
    ConfigError = 14,

    /// I/O or serialization error
    IoError = 15,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean)
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::InvalidCpt { .. } | Error::InvalidVariable { .. } | Error::MalformedGraph(_) => {
                ExitCode::ModelError
            }
            Error::NotFound(_) | Error::IdNotFound(_) | Error::InvalidEvidence { .. } => {
                ExitCode::LookupError
            }
            Error::InconsistentEvidence { .. } | Error::IncompleteAssignment { .. } => {
                ExitCode::EvidenceError
            }
            Error::UnsupportedInference(_) | Error::EmptyDistribution(_) => {
                ExitCode::InferenceError
            }
            Error::Config(_) => ExitCode::ConfigError,
            Error::Io(_) | Error::Json(_) => ExitCode::IoError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}
