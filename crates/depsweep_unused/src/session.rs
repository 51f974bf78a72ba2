use anyhow::Result;
use log::{debug, info};
use std::path::{Path, PathBuf};

use depsweep_core::{
    Corpus, CorpusConfig, InstalledPackages, Manifest, PackageManager, PeerLookup, ProjectConfig,
    load_corpus, load_manifest, load_project_config,
};

use crate::{
    filter::IgnoreFilter,
    special::{ProjectContext, SpecialCaseRegistry},
    usage::{Strictness, UsageDetector},
    verdict::{Classifier, Verdicts},
};

/// Verdicts for the classified packages plus the names left out by the
/// ignore filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    pub verdicts: Verdicts,
    pub ignored: Vec<String>,
}

/// Everything one analysis run reads, loaded once up front.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    pub root: PathBuf,
    pub manifest: Manifest,
    pub config: ProjectConfig,
    pub package_manager: PackageManager,
    pub corpus: Corpus,
    pub strictness: Strictness,
}

impl AnalysisSession {
    /// Loads the manifest, project config, package manager and corpus.
    ///
    /// Only a missing or malformed manifest is an error; the rest falls back
    /// to defaults.
    pub fn open(root: &Path, strict: bool) -> Result<Self> {
        let manifest = load_manifest(root)?;
        let config = load_project_config(root);
        let package_manager = PackageManager::detect(root);
        debug!("Detected package manager: {}", package_manager);

        let strictness =
            if strict || config.strict { Strictness::Strict } else { Strictness::Conservative };
        debug!("Usage strictness: {:?}", strictness);

        let corpus = load_corpus(&CorpusConfig::new(root))?;
        info!("Cached {} files under {}", corpus.len(), root.display());

        Ok(Self {
            root: root.to_path_buf(),
            manifest,
            config,
            package_manager,
            corpus,
            strictness,
        })
    }

    /// Declared dependency names, in declaration order.
    pub fn declared(&self) -> Vec<String> {
        self.manifest.declared_dependencies().into_iter().map(|d| d.name).collect()
    }

    /// Splits declared names into (to classify, ignored).
    pub fn partition(&self) -> (Vec<String>, Vec<String>) {
        let filter = IgnoreFilter::new(&self.config.ignore, &self.config.ignore_patterns);
        self.declared().into_iter().partition(|name| !filter.should_ignore(name))
    }

    /// Classifies with peers read from the installed packages.
    pub fn analyze(&self) -> Analysis {
        let installed = InstalledPackages::new(&self.root);
        self.analyze_with(&installed)
    }

    pub fn analyze_with(&self, peers: &dyn PeerLookup) -> Analysis {
        let (packages, ignored) = self.partition();
        if !ignored.is_empty() {
            debug!("Ignoring {} packages: {}", ignored.len(), ignored.join(", "));
        }

        let detector = UsageDetector::new(self.strictness, &self.config.usage_patterns);
        let registry = SpecialCaseRegistry::with_overrides(&self.config.special_packages);
        let context = ProjectContext::new(&self.root, &self.manifest, self.package_manager);
        let classifier = Classifier {
            corpus: &self.corpus,
            detector: &detector,
            registry: &registry,
            context: &context,
            peers,
        };

        let verdicts = classifier.classify(&packages);
        info!("Classified {} packages, {} unused", verdicts.len(), verdicts.unused().len());
        Analysis { verdicts, ignored }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::Reason;
    use std::{collections::HashMap, fs};
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(file_path, content).unwrap();
    }

    fn no_peers() -> HashMap<String, Vec<String>> {
        HashMap::new()
    }

    #[test]
    fn test_open_requires_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let err = AnalysisSession::open(temp_dir.path(), false).unwrap_err();
        assert!(err.to_string().contains("package.json"));
    }

    #[test]
    fn test_open_loads_everything() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "package.json", r#"{"name": "app", "dependencies": {"a": "1"}}"#);
        create_test_file(root, ".cleanupdepsrc", r#"{"strict": true}"#);
        create_test_file(root, "yarn.lock", "");
        create_test_file(root, "src/index.js", "require('a')");

        let session = AnalysisSession::open(root, false).unwrap();
        assert_eq!(session.manifest.name.as_deref(), Some("app"));
        assert_eq!(session.package_manager, PackageManager::Yarn);
        assert_eq!(session.strictness, Strictness::Strict);
        assert_eq!(session.corpus.len(), 1);
        assert_eq!(session.declared(), vec!["a"]);
    }

    #[test]
    fn test_ignored_packages_are_never_classified() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(
            root,
            "package.json",
            r#"{
                "dependencies": {"left-pad": "^1", "eslint": "^9"},
                "devDependencies": {"@types/node": "^20"}
            }"#,
        );
        create_test_file(
            root,
            ".cleanupdepsrc.json",
            r#"{"ignore": ["eslint"], "ignorePatterns": ["@types/*"]}"#,
        );

        let session = AnalysisSession::open(root, false).unwrap();
        let analysis = session.analyze_with(&no_peers());
        assert_eq!(analysis.ignored, vec!["eslint", "@types/node"]);
        assert!(!analysis.verdicts.contains("@types/node"));
        assert!(!analysis.verdicts.contains("eslint"));
        assert_eq!(analysis.verdicts.unused(), vec!["left-pad"]);
    }

    #[test]
    fn test_config_extends_registry_and_patterns() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(
            root,
            "package.json",
            r#"{"dependencies": {"storybook": "^8", "gulp-sass": "^5"}}"#,
        );
        create_test_file(
            root,
            ".cleanupdepsrc",
            r#"{
                "specialPackages": {"storybook": [".storybook"]},
                "usagePatterns": ["loadPlugin\\(['\"]{name}['\"]"],
                "strict": true
            }"#,
        );
        create_test_file(root, ".storybook/main.js", "module.exports = {};");
        create_test_file(root, "gulpfile.js", "loadPlugin('gulp-sass');");

        let session = AnalysisSession::open(root, false).unwrap();
        let analysis = session.analyze_with(&no_peers());
        assert_eq!(
            analysis.verdicts.get("storybook").unwrap().reason,
            Some(Reason::SpecialPackage)
        );
        assert_eq!(analysis.verdicts.get("gulp-sass").unwrap().reason, Some(Reason::UsedInCode));
    }

    #[test]
    fn test_analyze_reads_installed_peers() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(
            root,
            "package.json",
            r#"{"dependencies": {"@tanstack/react-query": "^5", "react": "^18"}}"#,
        );
        create_test_file(root, "src/app.tsx", "import { useQuery } from '@tanstack/react-query';");
        create_test_file(
            root,
            "node_modules/@tanstack/react-query/package.json",
            r#"{"peerDependencies": {"react": "^18"}}"#,
        );

        let analysis = AnalysisSession::open(root, true).unwrap().analyze();
        assert_eq!(
            analysis.verdicts.get("react").unwrap().reason,
            Some(Reason::PeerOf("@tanstack/react-query".into()))
        );
    }
}
