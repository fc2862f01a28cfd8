//! Design repository contract
//!
//! The composition layer only needs to read designs, loci and acts by id,
//! find a locus by path, and create records. Creation goes through a
//! [`WriteBatch`] committed in one call, which every store must apply
//! all-or-nothing.
//!
//! - [`MemoryStore`]: in-process maps, used by tests and the CLI
//! - [`JsonFileStore`]: a `MemoryStore` snapshot persisted as one JSON file

mod records;
mod batch;
mod memory;
mod json;
mod draft;

pub use records::{ActKind, ActMeta, ActRecord, Design, DesignMeta, FaxOrigin, LocusRecord, Provenance};
pub use batch::WriteBatch;
pub use memory::{MemoryStore, StoreSnapshot};
pub use json::JsonFileStore;
pub use draft::DesignDraft;

use crate::locus::LocusPath;

/// Store-level failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Conflicting record: {0}")]
    Conflict(String),

    #[error("Dangling reference: {0}")]
    MissingReference(String),

    #[error("Invalid record: {0}")]
    Invalid(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Read and create operations over designs, loci and acts
pub trait DesignStore {
    fn design(&self, id: &str) -> Result<Option<Design>, StoreError>;

    fn locus(&self, id: &str) -> Result<Option<LocusRecord>, StoreError>;

    fn find_locus(&self, dialogue_id: &str, path: &LocusPath) -> Result<Option<LocusRecord>, StoreError>;

    /// Acts of a design ordered by `order_in_design`
    fn acts(&self, design_id: &str) -> Result<Vec<ActRecord>, StoreError>;

    /// Apply every record in `batch`, or none of them
    fn commit(&mut self, batch: WriteBatch) -> Result<(), StoreError>;
}
