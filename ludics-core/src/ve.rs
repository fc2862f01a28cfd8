//! VE sets: behaviours as finite sets of paths over one base
//!
//! A `Ve` is an immutable value: every operation on it returns a new set.
//! Paths are deduplicated structurally and keep first-seen order.

use crate::locus::LocusPath;
use crate::path::Path;
use crate::saturation::standard_clique;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "VeRepr")]
pub struct Ve {
    pub base: LocusPath,
    paths: Vec<Path>,
}

#[derive(Deserialize)]
struct VeRepr {
    #[serde(default)]
    base: LocusPath,
    #[serde(default)]
    paths: Vec<Path>,
}

impl From<VeRepr> for Ve {
    fn from(repr: VeRepr) -> Self {
        Ve::new(repr.base, repr.paths)
    }
}

impl Ve {
    pub fn new(base: LocusPath, paths: impl IntoIterator<Item = Path>) -> Self {
        Self { base, paths: dedup(paths) }
    }

    pub fn empty(base: LocusPath) -> Self {
        Self { base, paths: Vec::new() }
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// Polarity dual of every path (`~S`)
    pub fn dual(&self) -> Ve {
        Ve::new(self.base.clone(), self.paths.iter().map(Path::dual))
    }

    /// Paths that are not a strict prefix of another path in the set
    pub fn maximal_paths(&self) -> Vec<&Path> {
        self.paths
            .iter()
            .filter(|p| !self.paths.iter().any(|q| q != *p && p.is_prefix_of(q)))
            .collect()
    }

    /// Canonical fingerprint: SHA256 over the sorted standard cliques of the
    /// maximal paths. Independent of path order.
    pub fn fingerprint(&self) -> String {
        let mut cliques: Vec<String> = self
            .maximal_paths()
            .into_iter()
            .map(|p| {
                let mut keys: Vec<String> = standard_clique(&self.paths, p).iter().map(|q| q.key()).collect();
                keys.sort();
                keys.join("||")
            })
            .collect();
        cliques.sort();
        let mut hasher = Sha256::new();
        hasher.update(self.base.as_str().as_bytes());
        for clique in &cliques {
            hasher.update(b"###");
            hasher.update(clique.as_bytes());
        }
        hex::encode(hasher.finalize())
    }

    pub fn summary(&self) -> String {
        format!(
            "Ve base={} | {} paths | {} maximal | fingerprint={}",
            self.base,
            self.paths.len(),
            self.maximal_paths().len(),
            &self.fingerprint()[..16]
        )
    }
}

/// Structural dedup keeping first occurrence
pub(crate) fn dedup(paths: impl IntoIterator<Item = Path>) -> Vec<Path> {
    let mut seen = HashSet::new();
    paths.into_iter().filter(|p| seen.insert(p.clone())).collect()
}

/// Membership index over a path set
pub(crate) struct PathIndex {
    members: HashSet<Path>,
    /// `w` for every `w·z` in the set, whatever the daimon's locus
    daimon_prefixes: HashSet<Path>,
}

impl PathIndex {
    pub(crate) fn new(paths: &[Path]) -> Self {
        let members = paths.iter().cloned().collect();
        let daimon_prefixes = paths.iter().filter(|p| p.ends_daimon()).map(Path::init).collect();
        Self { members, daimon_prefixes }
    }

    pub(crate) fn contains(&self, path: &Path) -> bool {
        self.members.contains(path)
    }

    /// Some `path·z` is in the set
    pub(crate) fn has_daimon_extension(&self, path: &Path) -> bool {
        self.daimon_prefixes.contains(path)
    }
}
