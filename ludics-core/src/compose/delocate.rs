//! Delocation: clone a design under a tag
//!
//! Every locus path gets `tag` inserted right after the root
//! (`0` → `0.tag`, `0.1.2` → `0.tag.1.2`). Acts are copied in order with
//! their ramification, rebound to the shifted loci.

use super::{load_design, locus_path, CancelToken, ComposeError};
use crate::locus::LocusPath;
use crate::store::{ActRecord, Design, DesignMeta, DesignStore, Provenance, WriteBatch};
use chrono::Utc;
use log::info;
use uuid::Uuid;

/// Create the delocated copy of `design_id` in one atomic commit
pub fn clone_design_with_shift<S: DesignStore + ?Sized>(
    store: &mut S,
    design_id: &str,
    tag: &str,
    cancel: &CancelToken,
) -> Result<Design, ComposeError> {
    let mut batch = WriteBatch::new();
    let design = stage_shift(&*store, &mut batch, design_id, tag)?;
    cancel.check()?;
    store.commit(batch)?;
    info!("Delocated design {} under tag {} as {}", design_id, tag, design.id);
    Ok(design)
}

/// Stage the delocated copy into `batch` without committing
pub(crate) fn stage_shift<S: DesignStore + ?Sized>(
    store: &S,
    batch: &mut WriteBatch,
    design_id: &str,
    tag: &str,
) -> Result<Design, ComposeError> {
    LocusPath::validate_segment(tag).map_err(|_| ComposeError::InvalidTag(tag.to_string()))?;
    let source = load_design(store, design_id)?;
    let root = locus_path(store, &source, &source.root_locus_id)?;
    let root_locus_id = batch.ensure_locus(store, &source.dialogue_id, &root.shifted(tag)?)?;

    let clone = Design {
        id: Uuid::new_v4().to_string(),
        dialogue_id: source.dialogue_id.clone(),
        participant_id: source.participant_id.clone(),
        root_locus_id,
        scope: source.scope.clone(),
        meta: DesignMeta {
            created_at: Utc::now(),
            provenance: Some(Provenance {
                shifted_from: source.id.clone(),
                tag: tag.to_string(),
            }),
        },
    };

    for act in store.acts(&source.id)? {
        let locus_id = match act.locus_id.as_deref() {
            Some(id) => {
                let shifted = locus_path(store, &source, id)?.shifted(tag)?;
                Some(batch.ensure_locus(store, &source.dialogue_id, &shifted)?)
            }
            None => None,
        };
        batch.acts.push(ActRecord {
            id: Uuid::new_v4().to_string(),
            design_id: clone.id.clone(),
            locus_id,
            ..act
        });
    }
    batch.designs.push(clone.clone());
    Ok(clone)
}
