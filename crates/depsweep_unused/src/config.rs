use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{debug, info};
use std::{env, path::PathBuf};

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "depsweep")]
#[command(about = "Find and remove unused dependencies in JavaScript/TypeScript projects")]
pub struct Config {
    /// Root directory of the project (defaults to the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Show the verdict for every package and log at debug level
    #[arg(long)]
    pub debug: bool,

    /// Report what would be removed without removing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Only count import, require and dynamic import forms as usage
    #[arg(long)]
    pub strict: bool,
}

impl Config {
    /// Initialize the config by resolving the root directory
    pub fn initialize(&mut self) -> Result<()> {
        let root = if let Some(r) = self.root.take() {
            debug!("Using provided root directory: {:?}", r);
            r.canonicalize().unwrap_or(r)
        } else {
            debug!("No root provided, using the current directory");
            env::current_dir().context("Failed to read the current directory")?
        };
        info!("Using root directory: {}", root.display());

        self.root = Some(root);
        Ok(())
    }

    /// Get the root directory, returning an error if not initialized
    pub fn root(&self) -> Result<&PathBuf> {
        self.root
            .as_ref()
            .ok_or_else(|| anyhow!("Config not initialized - call initialize() first"))
    }
}
