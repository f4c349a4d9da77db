//! Engine configuration types.
//!
//! `engine.json` tunes the inference engine without touching network
//! definitions, which are built in code by the caller.

use std::path::Path;

use bn_common::InferenceKind;
use serde::{Deserialize, Serialize};

/// Default CPT row-sum tolerance: rows must sum into `(1 - ε, 1]`.
pub const DEFAULT_CPT_TOLERANCE: f64 = 1e-12;

/// Largest tolerance accepted by validation.
const MAX_CPT_TOLERANCE: f64 = 1e-3;

/// Errors that can occur while loading or validating engine configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported config schema version: {0}")]
    UnsupportedVersion(String),

    #[error("cpt_tolerance must be in (0, {max}], got {value}")]
    InvalidTolerance { value: f64, max: f64 },

    #[error("log_level must not be empty")]
    EmptyLogLevel,
}

impl From<ConfigError> for bn_common::Error {
    fn from(err: ConfigError) -> Self {
        bn_common::Error::Config(err.to_string())
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Row-sum tolerance ε used when validating CPTs.
    #[serde(default = "default_cpt_tolerance")]
    pub cpt_tolerance: f64,

    /// Inference mode used when the caller does not pick one.
    #[serde(default)]
    pub inference: InferenceKind,

    /// Fallback `tracing` filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_schema_version() -> String {
    crate::CONFIG_SCHEMA_VERSION.to_string()
}

fn default_cpt_tolerance() -> f64 {
    DEFAULT_CPT_TOLERANCE
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            cpt_tolerance: DEFAULT_CPT_TOLERANCE,
            inference: InferenceKind::default(),
            log_level: default_log_level(),
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Semantic validation beyond what serde enforces.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !bn_common::schema::is_compatible(&self.schema_version) {
            return Err(ConfigError::UnsupportedVersion(self.schema_version.clone()));
        }
        if !(self.cpt_tolerance > 0.0 && self.cpt_tolerance <= MAX_CPT_TOLERANCE) {
            return Err(ConfigError::InvalidTolerance {
                value: self.cpt_tolerance,
                max: MAX_CPT_TOLERANCE,
            });
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::EmptyLogLevel);
        }
        Ok(())
    }
}
