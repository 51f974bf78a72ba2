use anyhow::{Context, Result};
use log::{debug, trace};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use crate::constants::{INSTALL_DIR, MANIFEST_FILE};

/// Source of peer-dependency declarations for installed packages.
pub trait PeerLookup {
    /// Peer dependency names of `package`; empty when unknown.
    fn peers_of(&self, package: &str) -> Vec<String>;
}

/// Fixed peer table, keyed by package name.
impl PeerLookup for HashMap<String, Vec<String>> {
    fn peers_of(&self, package: &str) -> Vec<String> {
        self.get(package).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstalledManifest {
    #[serde(default)]
    peer_dependencies: Option<Map<String, Value>>,
}

/// Reads installed package manifests from `<root>/node_modules/<pkg>/package.json`.
#[derive(Debug, Clone)]
pub struct InstalledPackages {
    install_dir: PathBuf,
}

impl InstalledPackages {
    pub fn new(root: &Path) -> Self {
        Self { install_dir: root.join(INSTALL_DIR) }
    }

    pub fn manifest_path(&self, package: &str) -> PathBuf {
        // Scoped names (`@scope/pkg`) map onto nested directories
        self.install_dir.join(package).join(MANIFEST_FILE)
    }

    /// Peer dependency names declared by an installed package.
    ///
    /// A package that is not installed has no peers; a manifest that cannot be
    /// read or parsed is an error.
    pub fn peer_dependencies(&self, package: &str) -> Result<Vec<String>> {
        let path = self.manifest_path(package);
        if !path.exists() {
            trace!("No installed manifest for {}", package);
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let manifest: InstalledManifest = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let peers: Vec<String> =
            manifest.peer_dependencies.map(|m| m.keys().cloned().collect()).unwrap_or_default();
        trace!("{} declares {} peer dependencies", package, peers.len());
        Ok(peers)
    }
}

impl PeerLookup for InstalledPackages {
    fn peers_of(&self, package: &str) -> Vec<String> {
        match self.peer_dependencies(package) {
            Ok(peers) => peers,
            Err(e) => {
                debug!("Could not read peer dependencies for {}: {:#}", package, e);
                Vec::new()
            }
        }
    }
}
