//! Core utilities for depsweep.
//!
//! This crate provides the project I/O that the dependency analysis builds on:
//! - Reading the `package.json` manifest and merging declared dependencies
//! - Loading the optional `.cleanupdepsrc` project configuration
//! - Detecting the package manager from its lockfile
//! - Looking up peer dependencies of installed packages
//! - Walking the project and caching file contents as a corpus

mod collector;
mod config;
mod constants;
mod installed;
mod manifest;
mod package_manager;
mod types;

// Re-export public API
pub use collector::{CorpusConfig, load_corpus};
pub use config::{ProjectConfig, load_project_config, read_project_config};
pub use constants::{
    CONFIG_FILES, EXCLUDED_DIRS, EXCLUDED_FILES, INSTALL_DIR, MANIFEST_FILE, SCANNED_EXTENSIONS,
    TYPES_PREFIX,
};
pub use installed::{InstalledPackages, PeerLookup};
pub use manifest::{Manifest, load_manifest, parse_manifest};
pub use package_manager::PackageManager;
pub use types::{Corpus, DeclaredDependency, SourceFile};
