//! Config file resolution.
//!
//! Precedence: explicit path (CLI) → `BAYESNET_CONFIG` → XDG config dir →
//! built-in defaults. Explicit and environment paths must exist; the XDG file
//! is optional.

use std::path::{Path, PathBuf};

use crate::engine::{ConfigError, EngineConfig};

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "BAYESNET_CONFIG";

const APP_DIR: &str = "bayesnet";
const CONFIG_FILE_NAME: &str = "engine.json";

/// Candidate config locations, highest precedence first.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    pub explicit: Option<PathBuf>,
    pub env: Option<PathBuf>,
    pub xdg: Option<PathBuf>,
}

impl ConfigPaths {
    /// Collect candidates from the process environment.
    pub fn discover(explicit: Option<PathBuf>) -> Self {
        Self {
            explicit,
            env: std::env::var_os(CONFIG_ENV_VAR)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            xdg: dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE_NAME)),
        }
    }
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Environment(PathBuf),
    Xdg(PathBuf),
    Defaults,
}

/// Resolve the effective engine configuration.
pub fn resolve_config(paths: &ConfigPaths) -> Result<(EngineConfig, ConfigSource), ConfigError> {
    if let Some(path) = &paths.explicit {
        return load(path).map(|c| (c, ConfigSource::Explicit(path.clone())));
    }
    if let Some(path) = &paths.env {
        return load(path).map(|c| (c, ConfigSource::Environment(path.clone())));
    }
    if let Some(path) = paths.xdg.as_ref().filter(|p| p.is_file()) {
        return load(path).map(|c| (c, ConfigSource::Xdg(path.clone())));
    }
    Ok((EngineConfig::default(), ConfigSource::Defaults))
}

fn load(path: &Path) -> Result<EngineConfig, ConfigError> {
    EngineConfig::load_from_file(path)
}
