//! Keep/remove verdicts and the passes that produce them.
//!
//! Classification is a fold over three passes. Each pass takes the previous
//! snapshot and returns a new one in which verdicts can only flip from remove
//! to keep:
//!
//! 1. direct evidence: code usage, then script usage, then special cases
//! 2. peer rescue: peers of packages kept by pass 1 (one level, no closure)
//! 3. types rescue: `@types/<base>` when `<base>` is kept after pass 2
//!
//! A types package that is already kept when its base is kept has its reason
//! replaced in pass 3 to name the base package it describes.

use depsweep_core::{Corpus, PeerLookup};
use log::debug;
use std::{collections::HashMap, fmt};

use crate::{
    special::{ProjectContext, SpecialCaseRegistry, types_base},
    usage::{UsageDetector, is_used_in_script},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    UsedInCode,
    UsedInScripts,
    SpecialPackage,
    PeerOf(String),
    TypesFor(String),
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::UsedInCode => f.write_str("Used in code"),
            Reason::UsedInScripts => f.write_str("Used in scripts"),
            Reason::SpecialPackage => f.write_str("Special package"),
            Reason::PeerOf(pkg) => write!(f, "Peer dependency of {}", pkg),
            Reason::TypesFor(pkg) => write!(f, "Type definitions for {}", pkg),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    pub keep: bool,
    /// Set whenever `keep` is true
    pub reason: Option<Reason>,
}

impl Verdict {
    pub fn keep(reason: Reason) -> Self {
        Self { keep: true, reason: Some(reason) }
    }

    pub fn remove() -> Self {
        Self::default()
    }
}

/// Verdicts for every classified package, in classification order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdicts {
    order: Vec<String>,
    entries: HashMap<String, Verdict>,
}

impl Verdicts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the first verdict for a package. Later calls for the same name
    /// are ignored; use [`Verdicts::keep`] to rescue a package.
    pub fn insert(&mut self, package: &str, verdict: Verdict) {
        if self.entries.contains_key(package) {
            return;
        }
        self.order.push(package.to_string());
        self.entries.insert(package.to_string(), verdict);
    }

    /// Flips a classified, not yet kept package to keep.
    ///
    /// Returns false when the package was never classified or is already kept.
    pub fn keep(&mut self, package: &str, reason: Reason) -> bool {
        match self.entries.get_mut(package) {
            Some(v) if !v.keep => {
                *v = Verdict::keep(reason);
                true
            }
            _ => false,
        }
    }

    /// Replaces the reason on a kept package.
    fn refine(&mut self, package: &str, reason: Reason) -> bool {
        match self.entries.get_mut(package) {
            Some(v) if v.keep => {
                v.reason = Some(reason);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, package: &str) -> Option<&Verdict> {
        self.entries.get(package)
    }

    pub fn contains(&self, package: &str) -> bool {
        self.entries.contains_key(package)
    }

    pub fn is_kept(&self, package: &str) -> bool {
        self.entries.get(package).is_some_and(|v| v.keep)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Verdict)> {
        self.order.iter().filter_map(|name| self.entries.get(name).map(|v| (name.as_str(), v)))
    }

    pub fn kept(&self) -> Vec<&str> {
        self.iter().filter(|(_, v)| v.keep).map(|(name, _)| name).collect()
    }

    pub fn unused(&self) -> Vec<&str> {
        self.iter().filter(|(_, v)| !v.keep).map(|(name, _)| name).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Pass 1: records direct evidence for every package.
pub fn direct_pass<F>(packages: &[String], mut evidence: F) -> Verdicts
where
    F: FnMut(&str) -> Option<Reason>,
{
    let mut verdicts = Verdicts::new();
    for package in packages {
        let verdict = match evidence(package) {
            Some(reason) => Verdict::keep(reason),
            None => Verdict::remove(),
        };
        verdicts.insert(package, verdict);
    }
    verdicts
}

/// Pass 2: keeps classified packages that a kept package lists as peers.
///
/// Only packages kept in `prev` are scanned, so a peer rescued here does not
/// rescue its own peers.
pub fn peer_pass(prev: &Verdicts, peers: &dyn PeerLookup) -> Verdicts {
    let mut next = prev.clone();
    for package in prev.kept() {
        for peer in peers.peers_of(package) {
            if next.keep(&peer, Reason::PeerOf(package.to_string())) {
                debug!("Rescued {} (peer of {})", peer, package);
            }
        }
    }
    next
}

/// Pass 3: keeps `@types/<base>` packages whose base is kept.
pub fn types_pass(prev: &Verdicts) -> Verdicts {
    let mut next = prev.clone();
    for (package, _) in prev.iter() {
        let Some(base) = types_base(package) else {
            continue;
        };
        if !prev.is_kept(&base) {
            continue;
        }
        if next.keep(package, Reason::TypesFor(base.clone())) {
            debug!("Kept {} (type definitions for {})", package, base);
        } else {
            next.refine(package, Reason::TypesFor(base));
        }
    }
    next
}

/// Everything the passes consult, borrowed from one analysis session.
pub struct Classifier<'a> {
    pub corpus: &'a Corpus,
    pub detector: &'a UsageDetector,
    pub registry: &'a SpecialCaseRegistry,
    pub context: &'a ProjectContext,
    pub peers: &'a dyn PeerLookup,
}

impl Classifier<'_> {
    /// Direct evidence for one package, in priority order.
    pub fn evidence(&self, package: &str) -> Option<Reason> {
        if let Some(hit) = self.detector.find_usage(package, self.corpus) {
            debug!("{}: {} in {}", package, hit.pattern, hit.file.display());
            return Some(Reason::UsedInCode);
        }
        if is_used_in_script(package, self.context.scripts()) {
            return Some(Reason::UsedInScripts);
        }
        if self.registry.is_special_cased(package, self.context) {
            return Some(Reason::SpecialPackage);
        }
        None
    }

    pub fn classify(&self, packages: &[String]) -> Verdicts {
        let direct = direct_pass(packages, |p| self.evidence(p));
        debug!("Pass 1 kept {} of {} packages", direct.kept().len(), direct.len());
        let rescued = peer_pass(&direct, self.peers);
        debug!("Pass 2 kept {} packages", rescued.kept().len());
        let typed = types_pass(&rescued);
        debug!("Pass 3 kept {} packages", typed.kept().len());
        typed
    }
}
