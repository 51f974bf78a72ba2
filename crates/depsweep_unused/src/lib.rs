//! Unused dependency analysis for JavaScript/TypeScript projects.
//!
//! Every dependency declared in `package.json` is classified as kept or
//! unused from textual evidence: import and require forms in the project
//! files, mentions in `scripts`, and companion config files for tooling that
//! is never imported. Two rescue passes then keep the peers of kept packages
//! and the `@types/*` packages of kept bases.
//!
//! # Examples
//!
//! ```no_run
//! use depsweep_unused::{Config, run_unused_check};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config {
//!     root: Some(std::path::PathBuf::from("/path/to/project")),
//!     ..Default::default()
//! };
//!
//! let result = run_unused_check(cfg)?;
//! let unused = result.unused();
//!
//! let mut stdout = BufWriter::new(std::io::stdout());
//! if unused.is_empty() {
//!     depsweep_unused::print_no_unused_message(&mut stdout, result.verdicts.len())?;
//! } else {
//!     depsweep_unused::print_unused_list(&mut stdout, &unused)?;
//! }
//! stdout.flush()?;
//! # Ok(())
//! # }
//! ```

mod checker;
mod config;
mod filter;
mod reporter;
mod session;
mod special;
mod types;
mod usage;
mod verdict;

// Re-export public API
pub use checker::run_unused_check;
pub use config::Config;
pub use filter::{IgnoreFilter, should_ignore};
pub use reporter::{
    print_dry_run_notice, print_header, print_no_unused_message, print_summary, print_unused_list,
    print_verdicts,
};
pub use session::{Analysis, AnalysisSession};
pub use special::{Matcher, ProjectContext, Rule, SpecialCase, SpecialCaseRegistry, types_base};
pub use types::{CheckResult, Stats};
pub use usage::{
    NAME_PLACEHOLDER, PatternTemplate, Strictness, UsageDetector, UsageMatch, builtin_patterns,
    is_used_in_script,
};
pub use verdict::{Classifier, Reason, Verdict, Verdicts, direct_pass, peer_pass, types_pass};
