//! Schema versioning for JSON documents (query output and engine config).

/// Current schema version for all JSON outputs.
///
/// MAJOR changes break readers; MINOR adds optional fields.
pub const SCHEMA_VERSION: &str = "1.0.0";

fn major(version: &str) -> Option<u32> {
    version.split('.').next().and_then(|s| s.parse::<u32>().ok())
}

/// Check whether a document written with `version` can be read by this build.
pub fn is_compatible(version: &str) -> bool {
    match (major(SCHEMA_VERSION), major(version)) {
        (Some(current), Some(other)) => current == other,
        _ => false,
    }
}
