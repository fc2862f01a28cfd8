//! Closure & saturation checker
//!
//! Decides whether a finite path set is a well-formed behaviour:
//! - **Closure**: prefix-closure on positive-ended prefixes, daimon-closure
//! - **Cliques**: coherence graph and bounded Bron–Kerbosch enumeration
//! - **Check**: standard cliques, positive/negative saturation, ludicability
//!
//! Every verdict is a plain `bool` (or a report); malformed input makes a
//! set non-ludicable and never panics.

mod closure;
mod clique;
mod check;

pub use closure::{is_daimon_closed, is_prefix_closed};
pub use clique::{coheres, maximal_cliques, CliqueEnumeration, CliqueLimits};
pub use check::{
    is_ludicable, is_negatively_saturated, is_pos_sat_clique, is_positively_saturated,
    is_pre_ludicable, standard_clique, Checker, LudicabilityReport, SideReport,
};
