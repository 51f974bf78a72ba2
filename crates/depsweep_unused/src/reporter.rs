use std::io::{self, Write};

use colored::Colorize;
use log::debug;

use crate::types::{CheckResult, Stats};

pub fn print_header<W: Write>(
    writer: &mut W,
    result: &CheckResult,
    dry_run: bool,
) -> io::Result<()> {
    let name = result.project_name.as_deref().unwrap_or("Unknown Project");
    let manager = result.package_manager.to_string();
    writeln!(writer, "{} {}", "Project:".bold(), name.cyan())?;
    writeln!(writer, "{} {}", "Package manager:".bold(), manager.cyan())?;
    if let Some(source) = &result.config_source {
        writeln!(writer, "{} {}", "Config:".bold(), source.display().to_string().dimmed())?;
    }
    if result.monorepo {
        writeln!(
            writer,
            "{} Monorepo detected: only the root package.json is analyzed",
            "⚠".yellow().bold()
        )?;
    }
    if dry_run {
        writeln!(writer, "{}", "Dry run: nothing will be removed".yellow())?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Per-package verdicts, printed in verbose mode.
pub fn print_verdicts<W: Write>(writer: &mut W, result: &CheckResult) -> io::Result<()> {
    debug!("Printing {} verdicts", result.verdicts.len());
    for (package, verdict) in result.verdicts.iter() {
        match (&verdict.reason, verdict.keep) {
            (Some(reason), true) => writeln!(
                writer,
                "  {} {} ({})",
                "KEEP".green().bold(),
                package,
                reason.to_string().dimmed()
            )?,
            _ => writeln!(writer, "  {} {}", "UNUSED".red().bold(), package)?,
        }
    }
    for package in &result.ignored {
        writeln!(writer, "  {} {}", "IGNORED".dimmed(), package)?;
    }
    writeln!(writer)?;
    Ok(())
}

pub fn print_unused_list<W: Write>(writer: &mut W, unused: &[&str]) -> io::Result<()> {
    writeln!(
        writer,
        "{} Found {} unused packages:",
        "⚠".yellow().bold(),
        unused.len().to_string().yellow().bold()
    )?;
    for (idx, package) in unused.iter().enumerate() {
        writeln!(writer, "  {}. {}", idx + 1, package.red())?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn print_no_unused_message<W: Write>(writer: &mut W, classified: usize) -> io::Result<()> {
    debug!("No unused dependencies");
    writeln!(
        writer,
        "{} No unused dependencies found. Checked {} packages",
        "✓".green().bold(),
        classified
    )?;
    writer.flush()?;
    Ok(())
}

pub fn print_dry_run_notice<W: Write>(writer: &mut W, unused: &[&str]) -> io::Result<()> {
    for package in unused {
        writeln!(writer, "  {} {}", "would remove".yellow(), package)?;
    }
    writeln!(writer)?;
    Ok(())
}

pub fn print_summary<W: Write>(writer: &mut W, stats: &Stats) -> io::Result<()> {
    writeln!(writer, "{}", "─".repeat(60).dimmed())?;
    writeln!(writer, "{}", "Summary".bold())?;
    writeln!(writer, "  Removed: {}", stats.removed.to_string().green().bold())?;
    writeln!(writer, "  Kept: {}", stats.kept.to_string().blue().bold())?;
    writeln!(writer, "  Skipped: {}", stats.skipped.to_string().yellow().bold())?;
    if stats.failed > 0 {
        writeln!(writer, "  Failed: {}", stats.failed.to_string().red().bold())?;
    }
    writer.flush()?;
    Ok(())
}
