//! Paths: one play, an ordered sequence of acts
//!
//! A legal path alternates polarity between proper acts, ends at most once
//! with a daimon, and only visits loci at or under the base and under some
//! locus already touched earlier in the same path.

use crate::act::{Act, Polarity};
use crate::locus::LocusPath;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Why a path is not a legal play. Only ever logged by the checker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("Daimon at position {0} is not the last act")]
    DaimonNotLast(usize),

    #[error("Polarity does not alternate at position {0}")]
    NotAlternating(usize),

    #[error("Act at position {index} sits at {locus}, outside base {base}")]
    OutsideBase {
        index: usize,
        locus: LocusPath,
        base: LocusPath,
    },

    #[error("Act at position {index} sits at {locus}, not nested under any earlier act")]
    Unjustified { index: usize, locus: LocusPath },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Vec<Act>", into = "Vec<Act>")]
pub struct Path(Vec<Act>);

impl Path {
    pub fn new(acts: Vec<Act>) -> Self {
        Self(acts.into_iter().map(Act::normalized).collect())
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn acts(&self) -> &[Act] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Act> {
        self.0.last()
    }

    pub fn ends_positive(&self) -> bool {
        self.last().is_some_and(Act::is_positive)
    }

    pub fn ends_negative(&self) -> bool {
        self.last().is_some_and(Act::is_negative)
    }

    pub fn ends_daimon(&self) -> bool {
        self.last().is_some_and(Act::is_daimon)
    }

    /// First `len` acts
    pub fn prefix(&self, len: usize) -> Path {
        Path(self.0[..len.min(self.0.len())].to_vec())
    }

    /// The path without its last act
    pub fn init(&self) -> Path {
        self.prefix(self.0.len().saturating_sub(1))
    }

    /// Same acts with one more appended
    pub fn extended(&self, act: Act) -> Path {
        let mut acts = self.0.clone();
        acts.push(act.normalized());
        Path(acts)
    }

    /// Act-wise prefix test on polarity, locus and key
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        self.0.len() <= other.0.len() && self.0.iter().zip(&other.0).all(|(a, b)| a == b)
    }

    /// Non-empty prefixes (including the path itself) ending on a positive act
    pub fn positive_ended_prefixes(&self) -> Vec<Path> {
        self.ended_prefixes(Polarity::Positive)
    }

    /// Non-empty prefixes (including the path itself) ending on a negative act
    pub fn negative_ended_prefixes(&self) -> Vec<Path> {
        self.ended_prefixes(Polarity::Negative)
    }

    fn ended_prefixes(&self, polarity: Polarity) -> Vec<Path> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, a)| a.polarity == polarity)
            .map(|(i, _)| self.prefix(i + 1))
            .collect()
    }

    /// Replace the last act by a daimon at the same locus
    pub fn with_daimon_tail(&self) -> Option<Path> {
        let last = self.last()?;
        Some(self.init().extended(Act::daimon(last.locus.clone())))
    }

    /// Polarity dual of every act; its own inverse
    pub fn dual(&self) -> Path {
        Path(self.0.iter().map(Act::dual).collect())
    }

    /// The `(locus, key)` pairs this path occupies
    pub fn footprint(&self) -> HashSet<(LocusPath, Option<String>)> {
        self.0.iter().map(Act::footprint).collect()
    }

    /// Canonical textual key, stable across runs
    pub fn key(&self) -> String {
        self.0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check legality against the behaviour base
    pub fn check_legal(&self, base: &LocusPath) -> Result<(), PathError> {
        let mut previous: Option<Polarity> = None;
        for (index, act) in self.0.iter().enumerate() {
            if act.is_daimon() && index + 1 != self.0.len() {
                return Err(PathError::DaimonNotLast(index));
            }
            if !base.is_prefix_of(&act.locus) {
                return Err(PathError::OutsideBase {
                    index,
                    locus: act.locus.clone(),
                    base: base.clone(),
                });
            }
            if index > 0 && !self.0[..index].iter().any(|earlier| earlier.locus.is_prefix_of(&act.locus)) {
                return Err(PathError::Unjustified { index, locus: act.locus.clone() });
            }
            if !act.is_daimon() {
                if previous == Some(act.polarity) {
                    return Err(PathError::NotAlternating(index));
                }
                previous = Some(act.polarity);
            }
        }
        Ok(())
    }
}

impl From<Vec<Act>> for Path {
    fn from(acts: Vec<Act>) -> Self {
        Path::new(acts)
    }
}

impl From<Path> for Vec<Act> {
    fn from(path: Path) -> Self {
        path.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lp(s: &str) -> LocusPath {
        LocusPath::parse(s).unwrap()
    }

    fn play() -> Path {
        Path::new(vec![
            Act::positive(lp("0"), "1"),
            Act::negative(lp("0.1"), "a"),
            Act::positive(lp("0.1.a"), "x"),
        ])
    }

    #[test]
    fn test_prefixes() {
        let p = play();
        let pos = p.positive_ended_prefixes();
        assert_eq!(pos.len(), 2);
        assert_eq!(pos[0].len(), 1);
        assert_eq!(pos[1], p);
        assert_eq!(p.negative_ended_prefixes(), vec![p.prefix(2)]);
        assert!(p.prefix(2).is_prefix_of(&p));
        assert!(!p.is_prefix_of(&p.prefix(2)));
        assert!(Path::empty().is_prefix_of(&p));
    }

    #[test]
    fn test_daimon_tail() {
        let p = play();
        let z = p.with_daimon_tail().unwrap();
        assert_eq!(z.len(), 3);
        assert!(z.ends_daimon());
        assert_eq!(z.last().unwrap().locus, lp("0.1.a"));
        assert!(Path::empty().with_daimon_tail().is_none());
    }

    #[test]
    fn test_dual_path_roundtrip() {
        let p = play().with_daimon_tail().unwrap();
        assert_eq!(p.dual().dual(), p);
        assert!(p.dual().acts()[0].is_negative());
        assert!(p.dual().ends_daimon());
    }

    #[test]
    fn test_daimon_key_dropped() {
        let raw = r#"[{"pol":"daimon","locus":"0","key":"junk"}]"#;
        let p: Path = serde_json::from_str(raw).unwrap();
        assert_eq!(p.last().unwrap().key, None);
    }

    #[test]
    fn test_legality() {
        let base = LocusPath::root();
        assert!(play().check_legal(&base).is_ok());
        assert!(play().with_daimon_tail().unwrap().check_legal(&base).is_ok());

        let twice_pos = Path::new(vec![Act::positive(lp("0"), "1"), Act::positive(lp("0.1"), "2")]);
        assert_eq!(twice_pos.check_legal(&base), Err(PathError::NotAlternating(1)));

        let early_daimon = Path::new(vec![Act::daimon(lp("0")), Act::negative(lp("0"), "1")]);
        assert_eq!(early_daimon.check_legal(&base), Err(PathError::DaimonNotLast(0)));

        let outside = Path::new(vec![Act::positive(lp("0.2"), "1")]);
        assert!(matches!(outside.check_legal(&lp("0.1")), Err(PathError::OutsideBase { .. })));

        let jump = Path::new(vec![Act::positive(lp("0.1"), "1"), Act::negative(lp("0.2"), "a")]);
        assert!(matches!(jump.check_legal(&base), Err(PathError::Unjustified { index: 1, .. })));
    }
}
