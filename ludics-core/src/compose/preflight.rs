//! Composition preflight

use super::delocate::stage_shift;
use super::{directory_at, load_design, locus_path, shared_base, CancelToken, ComposeError};
use crate::store::{Design, DesignStore, WriteBatch};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const POS_TAG: &str = "L";
pub const NEG_TAG: &str = "R";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositionMode {
    /// No collision check; the caller vouches for disjointness
    #[default]
    Assoc,
    /// Directory overlap blocks the composition
    Partial,
    /// Directory overlap is repaired by delocating both designs
    Spiritual,
}

impl fmt::Display for CompositionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompositionMode::Assoc => "assoc",
            CompositionMode::Partial => "partial",
            CompositionMode::Spiritual => "spiritual",
        })
    }
}

impl FromStr for CompositionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assoc" => Ok(CompositionMode::Assoc),
            "partial" => Ok(CompositionMode::Partial),
            "spiritual" => Ok(CompositionMode::Spiritual),
            other => Err(format!("unknown composition mode: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreflightRequest {
    pub dialogue_id: String,
    pub pos_design_id: String,
    pub neg_design_id: String,
    #[serde(default)]
    pub mode: CompositionMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreflightNote {
    #[serde(rename = "assoc")]
    Assoc,
    #[serde(rename = "partial-ok")]
    PartialOk,
    #[serde(rename = "spiritual-noop")]
    SpiritualNoop,
    #[serde(rename = "shift-inserted")]
    ShiftInserted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftTags {
    pub pos_tag: String,
    pub neg_tag: String,
}

impl Default for ShiftTags {
    fn default() -> Self {
        Self {
            pos_tag: POS_TAG.to_string(),
            neg_tag: NEG_TAG.to_string(),
        }
    }
}

/// Result of a preflight. A collision is an ordinary outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "PreflightWire", try_from = "PreflightWire")]
pub enum PreflightOutcome {
    Blocked {
        collisions: Vec<String>,
    },
    Ready {
        pos_design_id: String,
        neg_design_id: String,
        collisions: Vec<String>,
        note: PreflightNote,
        shifted: Option<ShiftTags>,
    },
}

impl PreflightOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, PreflightOutcome::Ready { .. })
    }

    pub fn collisions(&self) -> &[String] {
        match self {
            PreflightOutcome::Blocked { collisions } | PreflightOutcome::Ready { collisions, .. } => collisions,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreflightWire {
    ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(default)]
    collisions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pos_design_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    neg_design_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    note: Option<PreflightNote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shifted: Option<ShiftTags>,
}

const COLLISION_REASON: &str = "dir-collision";

impl From<PreflightOutcome> for PreflightWire {
    fn from(outcome: PreflightOutcome) -> Self {
        match outcome {
            PreflightOutcome::Blocked { collisions } => PreflightWire {
                ok: false,
                reason: Some(COLLISION_REASON.to_string()),
                collisions,
                pos_design_id: None,
                neg_design_id: None,
                note: None,
                shifted: None,
            },
            PreflightOutcome::Ready {
                pos_design_id,
                neg_design_id,
                collisions,
                note,
                shifted,
            } => PreflightWire {
                ok: true,
                reason: None,
                collisions,
                pos_design_id: Some(pos_design_id),
                neg_design_id: Some(neg_design_id),
                note: Some(note),
                shifted,
            },
        }
    }
}

impl TryFrom<PreflightWire> for PreflightOutcome {
    type Error = String;

    fn try_from(wire: PreflightWire) -> Result<Self, Self::Error> {
        if !wire.ok {
            return match wire.reason.as_deref() {
                Some(COLLISION_REASON) => Ok(PreflightOutcome::Blocked {
                    collisions: wire.collisions,
                }),
                other => Err(format!("unknown preflight failure reason: {other:?}")),
            };
        }
        match (wire.pos_design_id, wire.neg_design_id, wire.note) {
            (Some(pos_design_id), Some(neg_design_id), Some(note)) => Ok(PreflightOutcome::Ready {
                pos_design_id,
                neg_design_id,
                collisions: wire.collisions,
                note,
                shifted: wire.shifted,
            }),
            _ => Err("successful preflight needs posDesignId, negDesignId and note".to_string()),
        }
    }
}

/// Decide whether the two designs of `request` may be linked.
///
/// Unknown ids and designs from another dialogue, scope or base fail with
/// an input error before any directory is read. In `spiritual` mode a
/// collision is repaired by cloning the positive design under `L` and the
/// negative one under `R` in a single commit; the outcome then names the
/// clones.
pub fn preflight<S: DesignStore + ?Sized>(
    store: &mut S,
    request: &PreflightRequest,
    cancel: &CancelToken,
) -> Result<PreflightOutcome, ComposeError> {
    let pos = load_design(&*store, &request.pos_design_id)?;
    let neg = load_design(&*store, &request.neg_design_id)?;
    ensure_compatible(&*store, request, &pos, &neg)?;

    let ready = |note, collisions, shifted| PreflightOutcome::Ready {
        pos_design_id: pos.id.clone(),
        neg_design_id: neg.id.clone(),
        collisions,
        note,
        shifted,
    };

    if request.mode == CompositionMode::Assoc {
        debug!("Preflight {} / {}: assoc", pos.id, neg.id);
        return Ok(ready(PreflightNote::Assoc, Vec::new(), None));
    }

    let collisions = collisions(&*store, &pos, &neg)?;
    match request.mode {
        CompositionMode::Partial if collisions.is_empty() => Ok(ready(PreflightNote::PartialOk, collisions, None)),
        CompositionMode::Partial => {
            info!("Preflight {} / {} blocked on {:?}", pos.id, neg.id, collisions);
            Ok(PreflightOutcome::Blocked { collisions })
        }
        _ if collisions.is_empty() => Ok(ready(PreflightNote::SpiritualNoop, collisions, None)),
        _ => {
            let mut batch = WriteBatch::new();
            let pos_clone = stage_shift(&*store, &mut batch, &pos.id, POS_TAG)?;
            let neg_clone = stage_shift(&*store, &mut batch, &neg.id, NEG_TAG)?;
            cancel.check()?;
            store.commit(batch)?;
            info!(
                "Preflight {} / {}: {} collisions, delocated to {} / {}",
                pos.id,
                neg.id,
                collisions.len(),
                pos_clone.id,
                neg_clone.id
            );
            Ok(PreflightOutcome::Ready {
                pos_design_id: pos_clone.id,
                neg_design_id: neg_clone.id,
                collisions,
                note: PreflightNote::ShiftInserted,
                shifted: Some(ShiftTags::default()),
            })
        }
    }
}

fn ensure_compatible<S: DesignStore + ?Sized>(
    store: &S,
    request: &PreflightRequest,
    pos: &Design,
    neg: &Design,
) -> Result<(), ComposeError> {
    let mismatch = |detail: String| ComposeError::ScopeMismatch {
        left: pos.id.clone(),
        right: neg.id.clone(),
        detail,
    };
    for design in [pos, neg] {
        if design.dialogue_id != request.dialogue_id {
            return Err(mismatch(format!(
                "design {} belongs to dialogue {}, not {}",
                design.id, design.dialogue_id, request.dialogue_id
            )));
        }
    }
    if pos.scope != neg.scope {
        return Err(mismatch(format!("scopes {:?} and {:?} differ", pos.scope, neg.scope)));
    }
    let pos_root = locus_path(store, pos, &pos.root_locus_id)?;
    let neg_root = locus_path(store, neg, &neg.root_locus_id)?;
    if pos_root == neg_root {
        return Ok(());
    }
    let (pos_base, neg_base) = (shared_base(store, pos)?, shared_base(store, neg)?);
    if pos_base != neg_base {
        return Err(mismatch(format!("bases {pos_base} and {neg_base} differ")));
    }
    Ok(())
}

/// Labels both designs open at their common root, sorted. Designs rooted
/// at different loci (e.g. `0.L` and `0.R`) are disjoint.
fn collisions<S: DesignStore + ?Sized>(store: &S, pos: &Design, neg: &Design) -> Result<Vec<String>, ComposeError> {
    let pos_root = locus_path(store, pos, &pos.root_locus_id)?;
    let neg_root = locus_path(store, neg, &neg.root_locus_id)?;
    if pos_root != neg_root {
        return Ok(Vec::new());
    }
    let left = directory_at(store, &pos.id, &pos_root)?;
    let right = directory_at(store, &neg.id, &neg_root)?;
    Ok(left.intersection(&right).cloned().collect())
}
