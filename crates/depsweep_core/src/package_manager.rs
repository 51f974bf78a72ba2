use log::debug;
use std::{fmt, path::Path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

/// Lockfiles in detection order; the first one present decides.
const LOCKFILES: &[(&str, PackageManager)] = &[
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("yarn.lock", PackageManager::Yarn),
    ("package-lock.json", PackageManager::Npm),
    ("bun.lockb", PackageManager::Bun),
    ("bun.lock", PackageManager::Bun),
];

impl PackageManager {
    /// Detects the package manager from the lockfile in `root`, defaulting to npm.
    pub fn detect(root: &Path) -> Self {
        for (lockfile, manager) in LOCKFILES {
            if root.join(lockfile).exists() {
                debug!("Found {}, using {}", lockfile, manager);
                return *manager;
            }
        }
        debug!("No lockfile found, defaulting to npm");
        PackageManager::default()
    }

    /// Executable name.
    pub fn binary(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Bun => "bun",
        }
    }

    pub fn removal_subcommand(self) -> &'static str {
        match self {
            PackageManager::Npm => "uninstall",
            PackageManager::Yarn | PackageManager::Pnpm | PackageManager::Bun => "remove",
        }
    }

    /// Full removal command line for one package, as shown to the user.
    pub fn removal_command(self, package: &str) -> String {
        format!("{} {} {}", self.binary(), self.removal_subcommand(), package)
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary())
    }
}
