use anyhow::Result;
use log::{debug, info, warn};

use crate::{config::Config, session::AnalysisSession, types::CheckResult};

pub fn run_unused_check(mut cfg: Config) -> Result<CheckResult> {
    info!("Starting unused dependency check");

    cfg.initialize()?;
    let root = cfg.root()?.clone();

    let session = AnalysisSession::open(&root, cfg.strict)?;
    let monorepo = session.manifest.is_monorepo();
    if monorepo {
        warn!("Monorepo detected (workspaces field); only the root package.json is analyzed");
    }
    debug!("Declared dependencies: {}", session.declared().len());

    let analysis = session.analyze();
    info!(
        "Unused dependency check complete. Found {} unused of {} classified",
        analysis.verdicts.unused().len(),
        analysis.verdicts.len()
    );

    Ok(CheckResult {
        root,
        project_name: session.manifest.name.clone(),
        package_manager: session.package_manager,
        verdicts: analysis.verdicts,
        ignored: analysis.ignored,
        files_analyzed: session.corpus.len(),
        config_source: session.config.source.clone(),
        monorepo,
    })
}
