//! The project manifest (`ato.yaml`).
//!
//! Only the dependency list and the modules path are understood here; every
//! other key is carried through a preserved bag so rewrites keep the rest of
//! the file intact.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AtofetchError;
use crate::spec;

pub const MANIFEST_FILE: &str = "ato.yaml";

const DEFAULT_MODULES_DIR: &str = ".ato/modules";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProjectManifest {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paths: Option<PathsSection>,

    #[serde(flatten)]
    pub extra: serde_yml::Mapping,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PathsSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<PathBuf>,

    #[serde(flatten)]
    pub extra: serde_yml::Mapping,
}

impl ProjectManifest {
    pub fn path_in(project_root: &Path) -> PathBuf {
        project_root.join(MANIFEST_FILE)
    }

    pub fn load(project_root: &Path) -> Result<Self, AtofetchError> {
        let path = Self::path_in(project_root);
        if !path.exists() {
            return Err(AtofetchError::ManifestMissing { path });
        }

        let raw = std::fs::read_to_string(&path).map_err(|source| AtofetchError::ManifestRead {
            path: path.clone(),
            source,
        })?;

        serde_yml::from_str(&raw).map_err(|source| AtofetchError::ManifestParse { path, source })
    }

    pub fn store(&self, project_root: &Path) -> Result<(), AtofetchError> {
        let path = Self::path_in(project_root);
        let rendered =
            serde_yml::to_string(self).map_err(|source| AtofetchError::ManifestSerialize {
                path: path.clone(),
                source,
            })?;

        std::fs::write(&path, rendered)
            .map_err(|source| AtofetchError::ManifestWrite { path, source })
    }

    /// Directory working copies are cloned into, relative to the project root.
    pub fn modules_dir(&self) -> PathBuf {
        self.paths
            .as_ref()
            .and_then(|paths| paths.modules.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODULES_DIR))
    }

    /// Insert `new_spec` into the dependency list, replacing any existing
    /// entry for the same package name. Returns whether the list changed.
    pub fn upsert_dependency(&mut self, new_spec: &str) -> bool {
        let name = spec::split(new_spec).name;
        let mut changed = false;

        if let Some(index) = self
            .dependencies
            .iter()
            .position(|entry| entry.as_str() != new_spec && spec::split(entry).name == name)
        {
            self.dependencies.remove(index);
            changed = true;
        }

        if !self.dependencies.iter().any(|entry| entry.as_str() == new_spec) {
            self.dependencies.push(new_spec.to_string());
            changed = true;
        }

        changed
    }
}

/// Record a dependency spec in the project manifest, rewriting the file only
/// when the dependency list actually changed.
pub fn add_dependency(project_root: &Path, new_spec: &str) -> Result<(), AtofetchError> {
    let mut manifest = ProjectManifest::load(project_root)?;
    if manifest.upsert_dependency(new_spec) {
        manifest.store(project_root)?;
    }
    Ok(())
}
