//! Bayesian network engine configuration loading and validation.
//!
//! This crate provides:
//! - The typed `EngineConfig` struct backing `engine.json`
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation

pub mod engine;
pub mod resolve;

pub use engine::{ConfigError, EngineConfig, DEFAULT_CPT_TOLERANCE};
pub use resolve::{resolve_config, ConfigPaths, ConfigSource, CONFIG_ENV_VAR};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = bn_common::SCHEMA_VERSION;
