//! Constants for project layout conventions.
//!
//! This module centralizes the file names and extensions that the corpus
//! loader, the manifest reader and the installed-package lookup agree on.
//!
//! ## Scanned Extensions
//!
//! - **Scripts**: `.js`, `.jsx`, `.mjs`, `.cjs`, `.ts`, `.tsx`, `.mts`, `.cts`
//! - **Components**: `.vue`, `.svelte`
//! - **Config and docs**: `.json`, `.md`
//! - **Styles**: `.css`, `.scss`

/// File extensions whose contents may reference a dependency
pub const SCANNED_EXTENSIONS: &[&str] = &[
    "js",  // JavaScript
    "jsx", // JavaScript with JSX
    "mjs", // JavaScript module
    "cjs", // JavaScript CommonJS
    "ts",  // TypeScript
    "tsx", // TypeScript with JSX
    "mts", // TypeScript module
    "cts", // TypeScript CommonJS
    "json", "md", "css", "scss", "vue", "svelte",
];

/// Directory names that are never descended into
pub const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".next",
    "dist",
    "build",
    ".vercel",
    "coverage",
    ".nyc_output",
];

/// The project manifest, read from the project root
pub const MANIFEST_FILE: &str = "package.json";

/// Directory holding installed packages, one manifest per package
pub const INSTALL_DIR: &str = "node_modules";

/// Project configuration candidates, in lookup order
pub const CONFIG_FILES: &[&str] = &[".cleanupdepsrc", ".cleanupdepsrc.json"];

/// Files kept out of the corpus. Each of them quotes declared package names
/// and would count as usage evidence for every dependency.
pub const EXCLUDED_FILES: &[&str] = &[MANIFEST_FILE, "package-lock.json", ".cleanupdepsrc.json"];

/// Namespace of type-declaration packages
pub const TYPES_PREFIX: &str = "@types/";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanned_extensions_cover_module_variants() {
        for ext in ["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"] {
            assert!(SCANNED_EXTENSIONS.contains(&ext), "missing script extension '{}'", ext);
        }
        assert_eq!(SCANNED_EXTENSIONS.len(), 14);
    }

    #[test]
    fn test_excluded_dirs_include_install_dir() {
        assert!(EXCLUDED_DIRS.contains(&INSTALL_DIR));
        assert!(EXCLUDED_DIRS.contains(&".git"));
        assert!(EXCLUDED_DIRS.contains(&"dist"));
    }

    #[test]
    fn test_manifest_is_never_scanned() {
        assert!(EXCLUDED_FILES.contains(&MANIFEST_FILE));
        // Only config candidates with a scanned extension need excluding
        for name in CONFIG_FILES {
            let scanned = name
                .rsplit_once('.')
                .is_some_and(|(stem, ext)| !stem.is_empty() && SCANNED_EXTENSIONS.contains(&ext));
            assert_eq!(scanned, EXCLUDED_FILES.contains(name), "config file '{}'", name);
        }
    }
}
