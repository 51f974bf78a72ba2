use anyhow::{Context, Result, bail};
use colored::Colorize;
use depsweep_core::PackageManager;
use depsweep_unused::Stats;
use dialoguer::{Confirm, Select, theme::ColorfulTheme};
use log::{debug, warn};
use std::{
    io::Write,
    path::{Path, PathBuf},
    process::Command,
};

/// Answer to the per-package removal prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    SkipRemaining,
}

pub trait Prompter {
    /// Asks once whether every unused package should go.
    fn confirm_all(&mut self, count: usize) -> Result<bool>;
    fn ask(&mut self, package: &str) -> Result<Answer>;
}

pub trait Uninstaller {
    fn uninstall(&mut self, package: &str) -> Result<()>;
}

#[derive(Default)]
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl Prompter for TerminalPrompter {
    fn confirm_all(&mut self, count: usize) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(format!("Remove all {} unused packages?", count))
            .default(false)
            .interact()
            .context("Failed to read confirmation")
    }

    fn ask(&mut self, package: &str) -> Result<Answer> {
        let choice = Select::with_theme(&self.theme)
            .with_prompt(format!("Remove {}?", package))
            .items(&["Yes", "No", "Skip remaining"])
            .default(1)
            .interact()
            .context("Failed to read answer")?;
        Ok(match choice {
            0 => Answer::Yes,
            2 => Answer::SkipRemaining,
            _ => Answer::No,
        })
    }
}

/// Runs `<manager> <remove> <package>` in the project root, inheriting stdio.
pub struct CommandUninstaller {
    root: PathBuf,
    manager: PackageManager,
}

impl CommandUninstaller {
    pub fn new(root: &Path, manager: PackageManager) -> Self {
        Self { root: root.to_path_buf(), manager }
    }
}

impl Uninstaller for CommandUninstaller {
    fn uninstall(&mut self, package: &str) -> Result<()> {
        debug!("Running: {}", self.manager.removal_command(package));
        let status = Command::new(self.manager.binary())
            .arg(self.manager.removal_subcommand())
            .arg(package)
            .current_dir(&self.root)
            .status()
            .with_context(|| format!("Failed to run {}", self.manager.binary()))?;
        if !status.success() {
            bail!("{} exited with {}", self.manager.removal_command(package), status);
        }
        Ok(())
    }
}

fn remove<W: Write, U: Uninstaller>(
    writer: &mut W,
    package: &str,
    uninstaller: &mut U,
    stats: &mut Stats,
) -> Result<()> {
    writeln!(writer, "{} {}", "Removing".yellow(), package)?;
    writer.flush()?;
    match uninstaller.uninstall(package) {
        Ok(()) => {
            writeln!(writer, "{} {} removed", "✓".green().bold(), package)?;
            stats.removed += 1;
        }
        Err(e) => {
            warn!("Failed to remove {}: {:#}", package, e);
            writeln!(writer, "{} Could not remove {}", "✗".red().bold(), package)?;
            stats.failed += 1;
        }
    }
    Ok(())
}

/// Lists what a real run would remove and counts it as removed.
///
/// Reporting is not a failure: the caller exits successfully.
pub fn report_dry_run<W: Write>(
    writer: &mut W,
    unused: &[&str],
    stats: &mut Stats,
) -> Result<()> {
    depsweep_unused::print_dry_run_notice(writer, unused)?;
    stats.removed = unused.len();
    depsweep_unused::print_summary(writer, stats)?;
    Ok(())
}

/// Removes unused packages one at a time, asking first.
///
/// A failed removal is counted and the queue moves on.
pub fn sweep<W, P, U>(
    writer: &mut W,
    unused: &[&str],
    prompter: &mut P,
    uninstaller: &mut U,
    stats: &mut Stats,
) -> Result<()>
where
    W: Write,
    P: Prompter,
    U: Uninstaller,
{
    if prompter.confirm_all(unused.len())? {
        for package in unused {
            remove(writer, package, uninstaller, stats)?;
        }
        return Ok(());
    }

    for (idx, package) in unused.iter().enumerate() {
        match prompter.ask(package)? {
            Answer::Yes => remove(writer, package, uninstaller, stats)?,
            Answer::No => stats.skipped += 1,
            Answer::SkipRemaining => {
                stats.skipped += unused.len() - idx;
                debug!("Skipping the remaining {} packages", unused.len() - idx);
                break;
            }
        }
    }
    Ok(())
}
