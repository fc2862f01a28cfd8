//! Ludics core: behaviours as finite path sets
//!
//! Decides whether a set of plays is a well-formed behaviour (closed,
//! saturated, and so is its dual), builds new behaviours with the MALL
//! connectives, and gates the composition of two stored designs through
//! directory preflight, delocation and fax.

pub mod locus;
pub mod act;
pub mod path;
pub mod ve;
pub mod saturation;
pub mod mall;
pub mod store;
pub mod compose;
pub mod config;

pub use locus::{LocusError, LocusPath};
pub use act::{Act, Polarity};
pub use path::{Path, PathError};
pub use ve::Ve;
pub use saturation::{is_ludicable, is_pre_ludicable, Checker, CliqueLimits, LudicabilityReport};
pub use mall::{ve_par, ve_plus, ve_shift_neg, ve_shift_pos, ve_tensor, ve_with};
pub use store::{DesignStore, JsonFileStore, MemoryStore, StoreError};
pub use compose::{
    clone_design_with_shift, fax_from_scope, preflight, CancelToken, ComposeError, CompositionMode, PreflightOutcome,
    PreflightRequest,
};
pub use config::LudicsConfig;
