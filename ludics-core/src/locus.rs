//! Locus addresses: dot-separated positions in the dialogue tree
//!
//! The root is always `"0"`; every child appends one segment
//! (`"0"` → `"0.1"` → `"0.1.2"`). Segments are non-empty and never
//! contain a dot, so a path can be split and rebuilt losslessly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Root segment shared by every address
pub const ROOT: &str = "0";

/// Errors produced while parsing or rewriting an address
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocusError {
    #[error("Empty locus address")]
    Empty,

    #[error("Locus must start at root \"0\": {0}")]
    NotRooted(String),

    #[error("Empty segment in locus address: {0}")]
    EmptySegment(String),

    #[error("Invalid segment label: {0:?}")]
    InvalidSegment(String),
}

/// A tree address such as `0.1.2`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocusPath(String);

impl LocusPath {
    /// The root address `"0"`
    pub fn root() -> Self {
        Self(ROOT.to_string())
    }

    /// Parse a dotted address, rejecting anything not rooted at `"0"`
    pub fn parse(raw: &str) -> Result<Self, LocusError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(LocusError::Empty);
        }
        let mut segments = raw.split('.');
        if segments.next() != Some(ROOT) {
            return Err(LocusError::NotRooted(raw.to_string()));
        }
        let rest: Vec<&str> = segments.collect();
        if rest.iter().any(|s| s.is_empty()) {
            return Err(LocusError::EmptySegment(raw.to_string()));
        }
        for segment in rest {
            Self::validate_segment(segment)?;
        }
        Ok(Self(raw.to_string()))
    }

    /// Check that a string may be used as a single segment
    pub fn validate_segment(label: &str) -> Result<(), LocusError> {
        if label.is_empty() || label.contains('.') || label.chars().any(char::is_whitespace) {
            return Err(LocusError::InvalidSegment(label.to_string()));
        }
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Number of edges from the root (`"0"` has depth 0)
    pub fn depth(&self) -> usize {
        self.0.matches('.').count()
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT
    }

    /// Append one segment
    pub fn child(&self, label: &str) -> Result<Self, LocusError> {
        Self::validate_segment(label)?;
        Ok(Self(format!("{}.{}", self.0, label)))
    }

    pub fn parent(&self) -> Option<Self> {
        self.0.rfind('.').map(|i| Self(self.0[..i].to_string()))
    }

    /// Last segment (the root's label is `"0"`)
    pub fn label(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(ROOT)
    }

    /// `self` equals `other` or lies on the way from the root to it
    pub fn is_prefix_of(&self, other: &LocusPath) -> bool {
        other.0 == self.0
            || (other.0.len() > self.0.len()
                && other.0.starts_with(&self.0)
                && other.0.as_bytes()[self.0.len()] == b'.')
    }

    /// Strict ancestor test
    pub fn is_ancestor_of(&self, other: &LocusPath) -> bool {
        self != other && self.is_prefix_of(other)
    }

    /// Insert `tag` as the segment right after the root:
    /// `0` → `0.tag`, `0.1.2` → `0.tag.1.2`
    pub fn shifted(&self, tag: &str) -> Result<Self, LocusError> {
        Self::validate_segment(tag)?;
        let rest = &self.0[ROOT.len()..];
        Ok(Self(format!("{ROOT}.{tag}{rest}")))
    }

    /// Inverse of [`shifted`](Self::shifted); `None` when the segment after
    /// the root is not `tag`
    pub fn unshifted(&self, tag: &str) -> Option<Self> {
        let mut segments = self.segments();
        segments.next()?;
        if segments.next()? != tag {
            return None;
        }
        let rest: Vec<&str> = segments.collect();
        if rest.is_empty() {
            Some(Self::root())
        } else {
            Some(Self(format!("{ROOT}.{}", rest.join("."))))
        }
    }

    /// Replace the leading root `"0"` with `target`:
    /// `0.1.2` rebased on `0.99` → `0.99.1.2`
    pub fn rebased(&self, target: &LocusPath) -> Self {
        let rest = &self.0[ROOT.len()..];
        Self(format!("{}{}", target.0, rest))
    }
}

impl Default for LocusPath {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for LocusPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LocusPath {
    type Err = LocusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for LocusPath {
    type Error = LocusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LocusPath> for String {
    fn from(value: LocusPath) -> Self {
        value.0
    }
}
