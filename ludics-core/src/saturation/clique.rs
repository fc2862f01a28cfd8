//! Coherence graph and maximal-clique enumeration
//!
//! Two paths cohere when one extends the other, or when they first part
//! ways on two distinct negative acts (the opponent branching). A split on
//! a positive act or a daimon is a choice of the player and makes the paths
//! incoherent, as does a split between acts of different polarity.
//!
//! Enumeration is Bron–Kerbosch with pivoting. It is worst-case exponential,
//! so [`CliqueLimits`] bounds the number of cliques reported and the size
//! of any one clique. Hitting either bound sets `truncated`, and a
//! truncated enumeration must not be read as a saturation verdict.

use crate::path::Path;
use log::warn;
use serde::{Deserialize, Serialize};

/// Bounds on clique enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliqueLimits {
    /// Stop after this many maximal cliques
    pub max_cliques: usize,
    /// Maximum clique size: a clique that would hold more than this many
    /// paths truncates the enumeration. One positive opening with `n`
    /// opponent branches already needs `n + 1`.
    pub max_depth: usize,
}

impl Default for CliqueLimits {
    fn default() -> Self {
        Self {
            max_cliques: 4096,
            max_depth: 512,
        }
    }
}

/// Result of a bounded enumeration
#[derive(Debug, Clone, Default)]
pub struct CliqueEnumeration {
    pub cliques: Vec<Vec<Path>>,
    /// A limit was hit; `cliques` is incomplete
    pub truncated: bool,
}

pub fn coheres(a: &Path, b: &Path) -> bool {
    match a.acts().iter().zip(b.acts()).position(|(x, y)| x != y) {
        None => true,
        Some(i) => a.acts()[i].is_negative() && b.acts()[i].is_negative(),
    }
}

/// All maximal pairwise-coherent subsets of `paths`, within `limits`
pub fn maximal_cliques(paths: &[Path], limits: &CliqueLimits) -> CliqueEnumeration {
    let n = paths.len();
    let mut adj = vec![vec![false; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            if coheres(&paths[i], &paths[j]) {
                adj[i][j] = true;
                adj[j][i] = true;
            }
        }
    }

    let mut search = BronKerbosch {
        adj: &adj,
        limits,
        found: Vec::new(),
        truncated: false,
    };
    search.expand(&mut Vec::new(), (0..n).collect(), Vec::new());

    if search.truncated {
        warn!(
            "Clique enumeration truncated at {} cliques (limits: {} cliques, {} paths per clique) over {} paths",
            search.found.len(),
            limits.max_cliques,
            limits.max_depth,
            n
        );
    }

    CliqueEnumeration {
        cliques: search
            .found
            .into_iter()
            .map(|idx| idx.into_iter().map(|i| paths[i].clone()).collect())
            .collect(),
        truncated: search.truncated,
    }
}

struct BronKerbosch<'a> {
    adj: &'a [Vec<bool>],
    limits: &'a CliqueLimits,
    found: Vec<Vec<usize>>,
    truncated: bool,
}

impl BronKerbosch<'_> {
    fn expand(&mut self, r: &mut Vec<usize>, mut p: Vec<usize>, mut x: Vec<usize>) {
        if self.truncated {
            return;
        }
        if p.is_empty() {
            if x.is_empty() && !r.is_empty() {
                if self.found.len() >= self.limits.max_cliques {
                    self.truncated = true;
                    return;
                }
                let mut clique = r.clone();
                clique.sort_unstable();
                self.found.push(clique);
            }
            return;
        }
        if r.len() >= self.limits.max_depth {
            self.truncated = true;
            return;
        }

        // pivot: vertex of P ∪ X with most neighbours in P
        let pivot = p
            .iter()
            .chain(x.iter())
            .copied()
            .max_by_key(|&u| p.iter().filter(|&&v| self.adj[u][v]).count())
            .unwrap_or(p[0]);
        let candidates: Vec<usize> = p.iter().copied().filter(|&v| !self.adj[pivot][v]).collect();

        for v in candidates {
            let next_p = p.iter().copied().filter(|&w| self.adj[v][w]).collect();
            let next_x = x.iter().copied().filter(|&w| self.adj[v][w]).collect();
            r.push(v);
            self.expand(r, next_p, next_x);
            r.pop();
            if self.truncated {
                return;
            }
            p.retain(|&w| w != v);
            x.push(v);
        }
    }
}
