use depsweep_core::PackageManager;
use std::path::PathBuf;

use crate::verdict::Verdicts;

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub root: PathBuf,
    pub project_name: Option<String>,
    pub package_manager: PackageManager,
    pub verdicts: Verdicts,
    /// Declared packages skipped by the ignore filter
    pub ignored: Vec<String>,
    pub files_analyzed: usize,
    /// Project config file in effect, if any
    pub config_source: Option<PathBuf>,
    pub monorepo: bool,
}

impl CheckResult {
    pub fn unused(&self) -> Vec<&str> {
        self.verdicts.unused()
    }

    pub fn kept_count(&self) -> usize {
        self.verdicts.kept().len()
    }
}

/// Outcome counts of a cleanup run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub removed: usize,
    pub kept: usize,
    pub skipped: usize,
    pub failed: usize,
}
