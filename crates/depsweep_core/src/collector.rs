use anyhow::Result;
use ignore::WalkBuilder;
use log::{debug, trace};
use std::{fs, path::PathBuf};

use crate::{
    constants::{EXCLUDED_DIRS, EXCLUDED_FILES, SCANNED_EXTENSIONS},
    types::{Corpus, SourceFile},
};

pub struct CorpusConfig {
    pub root: PathBuf,
    /// Directory names pruned from the walk
    pub excluded_dirs: Vec<String>,
    /// Extensions (without the dot) of files worth scanning
    pub extensions: Vec<String>,
    /// File names never scanned, wherever they appear
    pub excluded_files: Vec<String>,
}

impl CorpusConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excluded_dirs: EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
            extensions: SCANNED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            excluded_files: EXCLUDED_FILES.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Walks the project and caches the text of every scanned file.
///
/// Excluded directories are pruned rather than filtered, so nothing under
/// `node_modules` is ever visited. Entries that cannot be read (permission
/// errors, files deleted mid-walk) are skipped. Non-UTF-8 content is decoded
/// lossily and kept.
pub fn load_corpus(cfg: &CorpusConfig) -> Result<Corpus> {
    debug!("Collecting corpus files");
    let root = &cfg.root;
    debug!("Walking directory tree from root: {}", root.display());

    let excluded_dirs = cfg.excluded_dirs.clone();
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |dent| {
            let is_dir = dent.file_type().is_some_and(|ft| ft.is_dir());
            let pruned = dent.depth() > 0
                && is_dir
                && dent.file_name().to_str().is_some_and(|n| excluded_dirs.iter().any(|d| d == n));
            if pruned {
                trace!("Pruning directory: {}", dent.path().display());
            }
            !pruned
        })
        .build();

    let mut files = Vec::new();
    for res in walker {
        let dent = match res {
            Ok(dent) => dent,
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let p = dent.path();
        if !dent.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let Some(file_name) = p.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if cfg.excluded_files.iter().any(|f| f == file_name) {
            trace!("Skipping excluded file: {}", p.display());
            continue;
        }

        let scanned = p
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| cfg.extensions.iter().any(|e| e == ext));
        if !scanned {
            continue;
        }

        match fs::read(p) {
            Ok(bytes) => {
                // Invalid UTF-8 sequences become U+FFFD; the file stays
                let text = String::from_utf8_lossy(&bytes).into_owned();
                trace!("Cached {} ({} bytes)", p.display(), bytes.len());
                files.push(SourceFile { path: p.to_path_buf(), text });
            }
            Err(e) => trace!("Skipping unreadable file {}: {}", p.display(), e),
        }
    }

    debug!("Collected {} corpus files", files.len());
    Ok(Corpus::new(files))
}
