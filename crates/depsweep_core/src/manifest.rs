use anyhow::{Context, Result};
use log::{debug, trace};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::{fs, path::Path};

use crate::{constants::MANIFEST_FILE, types::DeclaredDependency};

/// The parts of `package.json` the analysis reads.
///
/// Mappings keep their declaration order (`serde_json` is built with
/// `preserve_order`), which is the order packages are classified and reported.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub name: Option<String>,
    #[serde(default)]
    pub dependencies: Option<Map<String, Value>>,
    #[serde(default)]
    pub dev_dependencies: Option<Map<String, Value>>,
    #[serde(default)]
    pub scripts: Option<Map<String, Value>>,
    #[serde(default)]
    pub workspaces: Option<Value>,
    /// Every other top-level field (`jest`, `lint-staged`, ...)
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Manifest {
    /// Merged `dependencies` and `devDependencies`.
    ///
    /// A name declared in both keeps its first position and takes the
    /// `devDependencies` version.
    pub fn declared_dependencies(&self) -> Vec<DeclaredDependency> {
        let mut merged: Map<String, Value> = Map::new();
        for section in [&self.dependencies, &self.dev_dependencies].into_iter().flatten() {
            for (name, version) in section {
                merged.insert(name.clone(), version.clone());
            }
        }

        merged
            .into_iter()
            .map(|(name, version)| {
                let version = match version {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                DeclaredDependency { name, version }
            })
            .collect()
    }

    /// Command strings of every declared script.
    pub fn script_commands(&self) -> Vec<String> {
        self.scripts
            .iter()
            .flatten()
            .filter_map(|(_, cmd)| cmd.as_str().map(str::to_string))
            .collect()
    }

    /// Whether a top-level field is present with a truthy value, using
    /// JavaScript truthiness (`null`, `false`, `0` and `""` are falsy).
    pub fn has_truthy_field(&self, key: &str) -> bool {
        match self.fields.get(key) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Array(_)) | Some(Value::Object(_)) => true,
        }
    }

    pub fn is_monorepo(&self) -> bool {
        self.workspaces.is_some()
    }
}

pub fn parse_manifest(content: &str) -> Result<Manifest> {
    let manifest: Manifest = serde_json::from_str(content)?;
    Ok(manifest)
}

/// Reads `package.json` from the project root.
pub fn load_manifest(root: &Path) -> Result<Manifest> {
    let path = root.join(MANIFEST_FILE);
    debug!("Reading manifest: {}", path.display());
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    let manifest = parse_manifest(&content)
        .with_context(|| format!("Could not parse {}", path.display()))?;
    trace!(
        "Manifest declares {} dependencies and {} dev dependencies",
        manifest.dependencies.as_ref().map_or(0, Map::len),
        manifest.dev_dependencies.as_ref().map_or(0, Map::len)
    );
    Ok(manifest)
}
