//! Manifest catalog validated once at startup.
//!
//! Every known manifest is resolved and checked before any cluster command
//! runs, so a missing file aborts the session instead of failing halfway
//! through a plan.
mod keys;

pub use keys::ManifestKey;

use crate::error::BootstrapError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Read-only mapping from logical manifest keys to manifest files.
#[derive(Debug, Clone)]
pub struct ManifestCatalog {
    root: PathBuf,
    entries: BTreeMap<ManifestKey, PathBuf>,
}

/// One row of `k8s-bootstrap verify` output.
#[derive(Debug, Serialize)]
pub struct ManifestCheck {
    pub key: ManifestKey,
    pub path: String,
    pub present: bool,
}

impl ManifestCatalog {
    /// Create an empty catalog rooted at `root`.
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            entries: BTreeMap::new(),
        }
    }

    /// Register every manifest in the static table.
    pub fn load(root: &Path) -> Result<Self, BootstrapError> {
        if !root.is_dir() {
            return Err(BootstrapError::ManifestNotFound(format!(
                "{} must exist and must be a directory",
                root.display()
            )));
        }
        let mut catalog = Self::new(root.to_path_buf());
        for key in ManifestKey::ALL {
            let directory = root.join(key.category().dir_name());
            catalog.register(*key, &directory, key.file_name())?;
        }
        tracing::debug!(
            root = %root.display(),
            manifests = catalog.len(),
            "manifest catalog loaded"
        );
        Ok(catalog)
    }

    pub fn register(
        &mut self,
        key: ManifestKey,
        directory: &Path,
        file_name: &str,
    ) -> Result<PathBuf, BootstrapError> {
        let path = directory.join(file_name);
        if !path.is_file() {
            return Err(BootstrapError::ManifestNotFound(format!(
                "{} must exist and must be a file",
                path.display()
            )));
        }
        self.entries.insert(key, path.clone());
        Ok(path)
    }

    pub fn lookup(&self, key: ManifestKey) -> Result<&Path, BootstrapError> {
        self.entries
            .get(&key)
            .map(PathBuf::as_path)
            .ok_or_else(|| {
                BootstrapError::ManifestNotFound(format!(
                    "the key '{key}' does not have an entry in the catalog"
                ))
            })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Report the presence of every manifest without failing on the first gap.
pub fn check_manifests(root: &Path) -> Vec<ManifestCheck> {
    ManifestKey::ALL
        .iter()
        .map(|key| {
            let rel = Path::new(key.category().dir_name()).join(key.file_name());
            ManifestCheck {
                key: *key,
                present: root.join(&rel).is_file(),
                path: rel.display().to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
