//! Composition of a positive-role and a negative-role design
//!
//! - **Directory**: ramification labels a design opens at a locus
//! - **Preflight**: decide whether two designs may be linked (`assoc`,
//!   `partial`, `spiritual`), delocating them when `spiritual` sees a clash
//! - **Delocate**: clone a design with every locus shifted under a tag
//! - **Fax**: import a filtered slice of one design into another
//!
//! Every store-backed call stages its writes in one [`WriteBatch`] and
//! checks its [`CancelToken`] right before the single commit.
//!
//! [`WriteBatch`]: crate::store::WriteBatch

mod cancel;
mod directory;
mod preflight;
mod delocate;
mod fax;

pub use cancel::CancelToken;
pub use directory::directory_at;
pub use preflight::{preflight, CompositionMode, PreflightNote, PreflightOutcome, PreflightRequest, ShiftTags};
pub use delocate::clone_design_with_shift;
pub use fax::{fax_from_scope, FaxFilter, FaxResult};

use crate::locus::{LocusError, LocusPath};
use crate::store::{Design, DesignStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("Unknown design: {0}")]
    UnknownDesign(String),

    #[error("Design {design_id} references unknown locus {locus_id}")]
    UnknownLocus { design_id: String, locus_id: String },

    #[error("Designs {left} and {right} do not share a dialogue/base scope: {detail}")]
    ScopeMismatch {
        left: String,
        right: String,
        detail: String,
    },

    #[error("Invalid delocation tag: {0:?}")]
    InvalidTag(String),

    #[error("Invalid locus: {0}")]
    InvalidLocus(#[from] LocusError),

    #[error("Operation cancelled before commit")]
    Cancelled,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ComposeError {
    /// Caller mistakes, never worth an automatic retry
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ComposeError::UnknownDesign(_)
                | ComposeError::ScopeMismatch { .. }
                | ComposeError::InvalidTag(_)
                | ComposeError::InvalidLocus(_)
        )
    }
}

pub(crate) fn load_design<S: DesignStore + ?Sized>(store: &S, id: &str) -> Result<Design, ComposeError> {
    store
        .design(id)?
        .ok_or_else(|| ComposeError::UnknownDesign(id.to_string()))
}

pub(crate) fn locus_path<S: DesignStore + ?Sized>(
    store: &S,
    design: &Design,
    locus_id: &str,
) -> Result<LocusPath, ComposeError> {
    store
        .locus(locus_id)?
        .map(|l| l.path)
        .ok_or_else(|| ComposeError::UnknownLocus {
            design_id: design.id.clone(),
            locus_id: locus_id.to_string(),
        })
}

/// Root path of a design with its delocation tag removed; delocated copies
/// keep the base of the design they were cloned from
pub fn shared_base<S: DesignStore + ?Sized>(store: &S, design: &Design) -> Result<LocusPath, ComposeError> {
    let root = locus_path(store, design, &design.root_locus_id)?;
    Ok(design
        .shift_tag()
        .and_then(|tag| root.unshifted(tag))
        .unwrap_or(root))
}
