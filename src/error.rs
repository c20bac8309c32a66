use std::path::PathBuf;
use thiserror::Error;

/// Invalid option combinations and registry misuse. Raised before any
/// snapshot is read.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("--scanning and --failed cannot be combined")]
    ScanningWithFailed,

    #[error("--low-space option requires --summary mode")]
    LowSpaceWithoutSummary,

    #[error("--low-space must be a finite percentage, got {0}")]
    LowSpaceNotFinite(f64),

    #[error("--min-bad-disks option requires --summary --failed mode")]
    MinBadDisksWithoutFailedSummary,

    #[error("JSON file is required")]
    MissingFile,

    #[error("invalid profile name '{0}'")]
    InvalidProfileName(String),

    #[error("no profile named '{0}'")]
    UnknownProfile(String),

    #[error("settings file {path}: {message}")]
    Settings { path: PathBuf, message: String },
}

/// Failures while turning a snapshot file into a server list.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", path.display())]
    Input {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not find servers in JSON structure (available top-level keys: [{}])", keys.join(", "))]
    Schema { keys: Vec<String> },
}
