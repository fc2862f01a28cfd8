//! Directories: labels a design opens at one locus

use super::{load_design, locus_path, ComposeError};
use crate::act::Polarity;
use crate::locus::LocusPath;
use crate::store::DesignStore;
use std::collections::{BTreeSet, HashMap};

/// Ramification labels of the design's own positive acts exactly at `locus`
pub fn directory_at<S: DesignStore + ?Sized>(
    store: &S,
    design_id: &str,
    locus: &LocusPath,
) -> Result<BTreeSet<String>, ComposeError> {
    let design = load_design(store, design_id)?;
    let mut paths: HashMap<String, LocusPath> = HashMap::new();
    let mut directory = BTreeSet::new();
    for act in store.acts(design_id)? {
        if act.polarity != Polarity::Positive {
            continue;
        }
        let Some(locus_id) = act.locus_id.as_deref() else {
            continue;
        };
        if !paths.contains_key(locus_id) {
            let path = locus_path(store, &design, locus_id)?;
            paths.insert(locus_id.to_string(), path);
        }
        if paths.get(locus_id) == Some(locus) {
            directory.extend(act.ramification.iter().cloned());
        }
    }
    Ok(directory)
}
