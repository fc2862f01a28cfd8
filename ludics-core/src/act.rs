//! Acts: one polarized move bound to a locus

use crate::locus::LocusPath;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Polarity of an action. The daimon is self-dual and ends a play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Polarity {
    #[serde(rename = "pos", alias = "positive", alias = "P", alias = "+")]
    Positive,
    #[serde(rename = "neg", alias = "negative", alias = "O", alias = "-")]
    Negative,
    #[serde(rename = "daimon", alias = "dagger")]
    Daimon,
}

impl Polarity {
    /// Swap Positive/Negative, keep Daimon
    pub fn dual(self) -> Self {
        match self {
            Polarity::Positive => Polarity::Negative,
            Polarity::Negative => Polarity::Positive,
            Polarity::Daimon => Polarity::Daimon,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Polarity::Positive => "+",
            Polarity::Negative => "-",
            Polarity::Daimon => "z",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Polarity::Positive => "pos",
            Polarity::Negative => "neg",
            Polarity::Daimon => "daimon",
        })
    }
}

impl FromStr for Polarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pos" | "positive" | "P" | "+" => Ok(Polarity::Positive),
            "neg" | "negative" | "O" | "-" => Ok(Polarity::Negative),
            "daimon" | "dagger" => Ok(Polarity::Daimon),
            other => Err(format!("unknown polarity: {other}")),
        }
    }
}

/// A single move: polarity, locus and (for proper acts) the ramification key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Act {
    #[serde(rename = "pol", alias = "polarity")]
    pub polarity: Polarity,
    pub locus: LocusPath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Act {
    pub fn positive(locus: LocusPath, key: impl Into<String>) -> Self {
        Self { polarity: Polarity::Positive, locus, key: Some(key.into()) }
    }

    pub fn negative(locus: LocusPath, key: impl Into<String>) -> Self {
        Self { polarity: Polarity::Negative, locus, key: Some(key.into()) }
    }

    /// Daimons never carry a key
    pub fn daimon(locus: LocusPath) -> Self {
        Self { polarity: Polarity::Daimon, locus, key: None }
    }

    pub fn is_positive(&self) -> bool {
        self.polarity == Polarity::Positive
    }

    pub fn is_negative(&self) -> bool {
        self.polarity == Polarity::Negative
    }

    pub fn is_daimon(&self) -> bool {
        self.polarity == Polarity::Daimon
    }

    /// Polarity dual; applying it twice yields the original act
    pub fn dual(&self) -> Self {
        Self {
            polarity: self.polarity.dual(),
            locus: self.locus.clone(),
            key: self.key.clone(),
        }
    }

    /// Drop a stray key on a daimon
    pub(crate) fn normalized(mut self) -> Self {
        if self.is_daimon() {
            self.key = None;
        }
        self
    }

    /// The `(locus, key)` pair this act occupies
    pub fn footprint(&self) -> (LocusPath, Option<String>) {
        (self.locus.clone(), self.key.clone())
    }

    /// The address this act opens for its successor (`locus.key`), if any
    pub fn opened(&self) -> Option<LocusPath> {
        self.key.as_deref().and_then(|k| self.locus.child(k).ok())
    }
}

impl fmt::Display for Act {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}/{}", self.polarity, self.locus, self.key.as_deref().unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lp(s: &str) -> LocusPath {
        LocusPath::parse(s).unwrap()
    }

    #[test]
    fn test_dual_is_involutive() {
        let acts = [
            Act::positive(lp("0"), "1"),
            Act::negative(lp("0.1"), "a"),
            Act::daimon(lp("0.1.a")),
        ];
        for a in &acts {
            assert_eq!(&a.dual().dual(), a);
        }
        assert_eq!(acts[2].dual(), acts[2]);
        assert!(acts[0].dual().is_negative());
    }

    #[test]
    fn test_polarity_aliases() {
        let a: Act = serde_json::from_str(r#"{"pol":"pos","locus":"0","key":"1"}"#).unwrap();
        assert!(a.is_positive());
        let b: Act = serde_json::from_str(r#"{"polarity":"O","locus":"0.1","key":"a"}"#).unwrap();
        assert!(b.is_negative());
        assert_eq!("daimon".parse::<Polarity>(), Ok(Polarity::Daimon));
        assert!("sideways".parse::<Polarity>().is_err());
        assert!(serde_json::from_str::<Act>(r#"{"pol":"maybe","locus":"0"}"#).is_err());
    }

    #[test]
    fn test_display_and_opened() {
        let a = Act::positive(lp("0.1"), "2");
        assert_eq!(a.to_string(), "pos@0.1/2");
        assert_eq!(a.opened(), Some(lp("0.1.2")));
        assert_eq!(Act::daimon(lp("0")).opened(), None);
    }
}
