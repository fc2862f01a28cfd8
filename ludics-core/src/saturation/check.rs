//! Saturation and ludicability
//!
//! Positive saturation is decided on the standard clique `Cp` of each path;
//! negative saturation quantifies over every positively saturated maximal
//! clique. Ludicability asks for both closures and both saturations, on the
//! set and on its polarity dual.

use super::clique::{maximal_cliques, CliqueLimits};
use super::closure::{is_daimon_closed, is_prefix_closed};
use crate::path::Path;
use crate::ve::{dedup, PathIndex, Ve};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Standard clique of `p`:
/// `{ q ∈ S | q ⊑ p } ∪ { w·κ⁻·z ∈ S | w ⊑ p, w·κ⁻ ⋢ p }`
pub fn standard_clique(paths: &[Path], p: &Path) -> Vec<Path> {
    let prefixes = paths.iter().filter(|q| q.is_prefix_of(p));
    let boundary = paths.iter().filter(|q| {
        if q.len() < 2 || !q.ends_daimon() {
            return false;
        }
        let w_kminus = q.init();
        let kminus_negative = w_kminus.last().is_some_and(|a| a.is_negative());
        kminus_negative && w_kminus.init().is_prefix_of(p) && !w_kminus.is_prefix_of(p)
    });
    dedup(prefixes.chain(boundary).cloned())
}

/// For all `m, n ∈ C` with `n = …κ⁻κ⁺`: `m·κ⁻·z ∈ S ⇒ m·κ⁻·κ⁺ ∈ S`
pub fn is_pos_sat_clique(paths: &[Path], clique: &[Path]) -> bool {
    pos_sat_clique(&PathIndex::new(paths), clique)
}

fn pos_sat_clique(index: &PathIndex, clique: &[Path]) -> bool {
    for n in clique {
        let acts = n.acts();
        if acts.len() < 2 || !n.ends_positive() || !acts[acts.len() - 2].is_negative() {
            continue;
        }
        let kminus = &acts[acts.len() - 2];
        let kplus = &acts[acts.len() - 1];
        for m in clique {
            let m_kminus = m.extended(kminus.clone());
            if index.has_daimon_extension(&m_kminus) && !index.contains(&m_kminus.extended(kplus.clone())) {
                debug!("Clique not positively saturated: {} κ⁻={} lacks κ⁺={}", m, kminus, kplus);
                return false;
            }
        }
    }
    true
}

/// Closed, and every path's standard clique is non-empty and positively saturated
pub fn is_positively_saturated(paths: &[Path]) -> bool {
    if !is_prefix_closed(paths) || !is_daimon_closed(paths) {
        return false;
    }
    let index = PathIndex::new(paths);
    paths.iter().all(|p| {
        let cp = standard_clique(paths, p);
        !cp.is_empty() && pos_sat_clique(&index, &cp)
    })
}

/// Negative saturation with the default clique limits
pub fn is_negatively_saturated(paths: &[Path]) -> bool {
    Checker::default().negatively_saturated(paths).0
}

/// Both closures plus both saturations, on `ve` alone
pub fn is_pre_ludicable(ve: &Ve) -> bool {
    Checker::default().is_pre_ludicable(ve)
}

/// Pre-ludicable, and so is its polarity dual
pub fn is_ludicable(ve: &Ve) -> bool {
    Checker::default().is_ludicable(ve)
}

/// Verdicts for one side (the set or its dual)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideReport {
    pub prefix_closed: bool,
    pub daimon_closed: bool,
    pub positively_saturated: bool,
    pub negatively_saturated: bool,
    /// Clique enumeration hit its limits
    pub truncated: bool,
}

impl SideReport {
    pub fn is_pre_ludicable(&self) -> bool {
        self.prefix_closed && self.daimon_closed && self.positively_saturated && self.negatively_saturated
    }
}

/// Per-condition breakdown of a ludicability check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LudicabilityReport {
    pub base: String,
    pub path_count: usize,
    /// Legality violations, one line per offending path
    pub malformed: Vec<String>,
    pub direct: SideReport,
    pub dual: SideReport,
    pub ludicable: bool,
}

impl LudicabilityReport {
    /// Either side's clique enumeration hit its limits, so a negative
    /// verdict may be an artefact of the caps
    pub fn truncated(&self) -> bool {
        self.direct.truncated || self.dual.truncated
    }
}

/// Checker carrying explicit enumeration limits
#[derive(Debug, Clone, Default)]
pub struct Checker {
    pub limits: CliqueLimits,
}

impl Checker {
    pub fn new(limits: CliqueLimits) -> Self {
        Self { limits }
    }

    /// Negative saturation; the flag reports whether enumeration was truncated.
    /// A truncated enumeration cannot certify the set and answers `false`.
    pub fn negatively_saturated(&self, paths: &[Path]) -> (bool, bool) {
        let enumeration = maximal_cliques(paths, &self.limits);
        if enumeration.truncated {
            return (false, true);
        }
        let index = PathIndex::new(paths);
        let kept: Vec<&Vec<Path>> = enumeration
            .cliques
            .iter()
            .filter(|c| pos_sat_clique(&index, c))
            .collect();

        let candidates = dedup(paths.iter().flat_map(Path::negative_ended_prefixes));
        for r in &candidates {
            if index.has_daimon_extension(r) {
                continue;
            }
            let m = r.init();
            let forced = kept.iter().all(|clique| {
                let continued = clique.iter().any(|q| r.is_prefix_of(q));
                continued || clique.iter().any(|q| q.ends_positive() && m.is_prefix_of(&q.init()))
            });
            if forced {
                debug!("Negative saturation fails: {} has no daimon extension", r);
                return (false, false);
            }
        }
        (true, false)
    }

    pub fn side(&self, paths: &[Path]) -> SideReport {
        let (negatively_saturated, truncated) = self.negatively_saturated(paths);
        SideReport {
            prefix_closed: is_prefix_closed(paths),
            daimon_closed: is_daimon_closed(paths),
            positively_saturated: is_positively_saturated(paths),
            negatively_saturated,
            truncated,
        }
    }

    /// Legality violations of `ve`'s paths, logged as move-compiler faults
    pub fn malformed(&self, ve: &Ve) -> Vec<String> {
        let faults: Vec<String> = ve
            .paths()
            .iter()
            .filter_map(|p| p.check_legal(&ve.base).err().map(|e| format!("{p}: {e}")))
            .collect();
        for fault in &faults {
            warn!("Move compiler invariant violated, malformed path {}", fault);
        }
        faults
    }

    pub fn is_pre_ludicable(&self, ve: &Ve) -> bool {
        self.malformed(ve).is_empty() && self.side(ve.paths()).is_pre_ludicable()
    }

    pub fn is_ludicable(&self, ve: &Ve) -> bool {
        self.is_pre_ludicable(ve) && self.side(ve.dual().paths()).is_pre_ludicable()
    }

    pub fn report(&self, ve: &Ve) -> LudicabilityReport {
        let malformed = self.malformed(ve);
        let direct = self.side(ve.paths());
        let dual = self.side(ve.dual().paths());
        let ludicable = malformed.is_empty() && direct.is_pre_ludicable() && dual.is_pre_ludicable();
        LudicabilityReport {
            base: ve.base.to_string(),
            path_count: ve.len(),
            malformed,
            direct,
            dual,
            ludicable,
        }
    }
}
