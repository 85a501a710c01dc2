use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtofetchError {
    #[error("manifest not found at {path} (is this an ato project?)")]
    ManifestMissing { path: PathBuf },

    #[error("failed to read manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        source: serde_yml::Error,
    },

    #[error("failed to serialize manifest {path}: {source}")]
    ManifestSerialize {
        path: PathBuf,
        source: serde_yml::Error,
    },

    #[error("failed to write manifest {path}: {source}")]
    ManifestWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid package name in spec '{0}'")]
    InvalidPackageName(String),

    #[error("component id {0} is invalid (expected 'C' followed by digits)")]
    InvalidComponentId(String),

    #[error("package {name} has uncommitted changes; aborting")]
    DirtyWorkingCopy { name: String },

    #[error("no tag of {name} satisfies the constraint '{constraint}'")]
    NoMatchingVersion { name: String, constraint: String },

    #[error("invalid version constraint '{constraint}': {source}")]
    BadConstraint {
        constraint: String,
        source: semver::Error,
    },

    #[error("footprint converter exited with status {status}\nstdout:\n{stdout}\nstderr:\n{stderr}")]
    ExternalTool {
        status: i32,
        stdout: String,
        stderr: String,
    },
}
