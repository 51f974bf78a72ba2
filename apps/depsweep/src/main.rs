mod cleanup;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use depsweep_unused::{Config, Stats};
use env_logger::Env;
use log::{debug, info};
use std::io::{BufWriter, Write};
use std::time::Instant;

use crate::cleanup::{CommandUninstaller, TerminalPrompter, report_dry_run, sweep};

fn main() -> Result<()> {
    let cfg = Config::parse();
    let level = if cfg.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
    debug!("Parsed CLI arguments: {:?}", cfg);

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let start = Instant::now();
    let result = depsweep_unused::run_unused_check(cfg.clone())?;
    let elapsed_ms = start.elapsed().as_millis();

    depsweep_unused::print_header(&mut stdout, &result, cfg.dry_run)?;
    if cfg.debug {
        depsweep_unused::print_verdicts(&mut stdout, &result)?;
    }
    writeln!(
        stdout,
        "{} Checked {} packages in {}ms on {} files.\n",
        "●".bright_blue(),
        result.verdicts.len().to_string().cyan(),
        elapsed_ms.to_string().cyan(),
        result.files_analyzed.to_string().cyan()
    )?;

    let unused = result.unused();
    let mut stats = Stats { kept: result.kept_count(), ..Default::default() };

    if unused.is_empty() {
        info!("No unused dependencies");
        depsweep_unused::print_no_unused_message(&mut stdout, result.verdicts.len())?;
        depsweep_unused::print_summary(&mut stdout, &stats)?;
        return Ok(());
    }

    depsweep_unused::print_unused_list(&mut stdout, &unused)?;

    if cfg.dry_run {
        return report_dry_run(&mut stdout, &unused, &mut stats);
    }

    let mut prompter = TerminalPrompter::default();
    let mut uninstaller = CommandUninstaller::new(&result.root, result.package_manager);
    sweep(&mut stdout, &unused, &mut prompter, &mut uninstaller, &mut stats)?;

    writeln!(stdout)?;
    depsweep_unused::print_summary(&mut stdout, &stats)?;
    Ok(())
}
