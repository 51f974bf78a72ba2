use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::constants::CONFIG_FILES;

/// Project-level settings read from `.cleanupdepsrc`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Exact package names that are never classified
    pub ignore: Vec<String>,
    /// Wildcard patterns; the first `*` matches any substring
    pub ignore_patterns: Vec<String>,
    /// Extra special-cased packages, each justified by any of the listed files
    pub special_packages: BTreeMap<String, Vec<String>>,
    /// Extra usage templates, `{name}` stands for the escaped package name
    pub usage_patterns: Vec<String>,
    /// Do not treat bare quoted mentions of a package as usage
    pub strict: bool,

    /// File the settings were read from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Reads one configuration file, recording where it came from.
pub fn read_project_config(path: &Path) -> Result<ProjectConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;
    let mut config: ProjectConfig = serde_json::from_str(&content)
        .with_context(|| format!("Could not parse {}", path.display()))?;
    config.source = Some(path.to_path_buf());
    Ok(config)
}

/// Loads the first parseable configuration file from the project root.
///
/// A candidate that exists but does not parse is reported and the next one is
/// tried; with no usable candidate the defaults apply.
pub fn load_project_config(root: &Path) -> ProjectConfig {
    for name in CONFIG_FILES {
        let path = root.join(name);
        if !path.is_file() {
            continue;
        }
        debug!("Found config candidate: {}", path.display());

        match read_project_config(&path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                return config;
            }
            Err(e) => warn!("Invalid config file, ignoring: {:#}", e),
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_project_config(temp_dir.path());
        assert_eq!(config, ProjectConfig::default());
        assert!(config.source.is_none());
    }

    #[test]
    fn test_full_config() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(".cleanupdepsrc"),
            r#"{
                "ignore": ["eslint", "prettier"],
                "ignorePatterns": ["@types/*", "*-loader"],
                "specialPackages": {"storybook": [".storybook"]},
                "usagePatterns": ["loadPlugin\\(\\s*['\"]{name}['\"]"],
                "strict": true
            }"#,
        )
        .unwrap();

        let config = load_project_config(temp_dir.path());
        assert_eq!(config.ignore, vec!["eslint", "prettier"]);
        assert_eq!(config.ignore_patterns, vec!["@types/*", "*-loader"]);
        assert_eq!(config.special_packages["storybook"], vec![".storybook"]);
        assert_eq!(config.usage_patterns.len(), 1);
        assert!(config.strict);
        assert_eq!(config.source, Some(temp_dir.path().join(".cleanupdepsrc")));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".cleanupdepsrc.json"), r#"{"ignore": ["husky"]}"#)
            .unwrap();

        let config = load_project_config(temp_dir.path());
        assert_eq!(config.ignore, vec!["husky"]);
        assert!(config.ignore_patterns.is_empty());
        assert!(!config.strict);
    }

    #[test]
    fn test_invalid_config_falls_back_to_next_candidate() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".cleanupdepsrc"), "{ invalid").unwrap();
        fs::write(temp_dir.path().join(".cleanupdepsrc.json"), r#"{"ignore": ["dotenv"]}"#)
            .unwrap();

        let config = load_project_config(temp_dir.path());
        assert_eq!(config.ignore, vec!["dotenv"]);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".cleanupdepsrc"), r#"{"ignore": "not-a-list"}"#).unwrap();

        let config = load_project_config(temp_dir.path());
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn test_read_error_names_the_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".cleanupdepsrc");
        fs::write(&path, "{ invalid").unwrap();

        let err = read_project_config(&path).unwrap_err();
        assert_eq!(err.to_string(), format!("Could not parse {}", path.display()));
        assert!(err.chain().count() > 1);

        let missing = temp_dir.path().join(".cleanupdepsrc.json");
        let err = read_project_config(&missing).unwrap_err();
        assert!(err.to_string().starts_with("Could not read"));
    }

    #[test]
    fn test_first_candidate_wins() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".cleanupdepsrc"), r#"{"ignore": ["a"]}"#).unwrap();
        fs::write(temp_dir.path().join(".cleanupdepsrc.json"), r#"{"ignore": ["b"]}"#).unwrap();

        let config = load_project_config(temp_dir.path());
        assert_eq!(config.ignore, vec!["a"]);
    }
}
