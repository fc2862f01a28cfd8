//! In-memory design store

use super::{ActRecord, Design, DesignStore, LocusRecord, StoreError, WriteBatch};
use crate::locus::LocusPath;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Flat, serializable view of a store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub loci: Vec<LocusRecord>,
    pub designs: Vec<Design>,
    pub acts: Vec<ActRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    loci: HashMap<String, LocusRecord>,
    by_path: HashMap<(String, LocusPath), String>,
    designs: HashMap<String, Design>,
    acts: HashMap<String, ActRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self, StoreError> {
        let mut store = Self::new();
        store.commit(WriteBatch {
            loci: snapshot.loci,
            designs: snapshot.designs,
            acts: snapshot.acts,
        })?;
        Ok(store)
    }

    /// Records sorted by id, so snapshots are stable on disk
    pub fn snapshot(&self) -> StoreSnapshot {
        let mut loci: Vec<LocusRecord> = self.loci.values().cloned().collect();
        loci.sort_by(|a, b| a.id.cmp(&b.id));
        let mut designs: Vec<Design> = self.designs.values().cloned().collect();
        designs.sort_by(|a, b| a.id.cmp(&b.id));
        let mut acts: Vec<ActRecord> = self.acts.values().cloned().collect();
        acts.sort_by(|a, b| a.id.cmp(&b.id));
        StoreSnapshot { loci, designs, acts }
    }

    pub fn design_count(&self) -> usize {
        self.designs.len()
    }

    pub fn locus_count(&self) -> usize {
        self.loci.len()
    }

    pub fn act_count(&self) -> usize {
        self.acts.len()
    }

    /// Designs of one dialogue, sorted by id
    pub fn designs_in(&self, dialogue_id: &str) -> Vec<&Design> {
        let mut designs: Vec<&Design> = self.designs.values().filter(|d| d.dialogue_id == dialogue_id).collect();
        designs.sort_by(|a, b| a.id.cmp(&b.id));
        designs
    }

    /// Reject the batch unless every record in it can be applied
    fn validate(&self, batch: &WriteBatch) -> Result<(), StoreError> {
        let mut locus_ids = HashSet::new();
        let mut paths = HashSet::new();
        for locus in &batch.loci {
            if self.loci.contains_key(&locus.id) || !locus_ids.insert(locus.id.as_str()) {
                return Err(StoreError::Conflict(format!("locus id {}", locus.id)));
            }
            let key = (locus.dialogue_id.clone(), locus.path.clone());
            if self.by_path.contains_key(&key) || !paths.insert(key) {
                return Err(StoreError::Conflict(format!(
                    "locus path {} in dialogue {}",
                    locus.path, locus.dialogue_id
                )));
            }
        }
        let known_locus = |id: &str| self.loci.contains_key(id) || locus_ids.contains(id);

        let mut design_ids = HashSet::new();
        for design in &batch.designs {
            if self.designs.contains_key(&design.id) || !design_ids.insert(design.id.as_str()) {
                return Err(StoreError::Conflict(format!("design id {}", design.id)));
            }
            if !known_locus(&design.root_locus_id) {
                return Err(StoreError::MissingReference(format!(
                    "design {} root locus {}",
                    design.id, design.root_locus_id
                )));
            }
        }

        let mut act_ids = HashSet::new();
        for act in &batch.acts {
            if self.acts.contains_key(&act.id) || !act_ids.insert(act.id.as_str()) {
                return Err(StoreError::Conflict(format!("act id {}", act.id)));
            }
            if !self.designs.contains_key(&act.design_id) && !design_ids.contains(act.design_id.as_str()) {
                return Err(StoreError::MissingReference(format!("act {} design {}", act.id, act.design_id)));
            }
            if let Some(locus_id) = &act.locus_id {
                if !known_locus(locus_id) {
                    return Err(StoreError::MissingReference(format!("act {} locus {}", act.id, locus_id)));
                }
            }
        }
        Ok(())
    }
}

impl DesignStore for MemoryStore {
    fn design(&self, id: &str) -> Result<Option<Design>, StoreError> {
        Ok(self.designs.get(id).cloned())
    }

    fn locus(&self, id: &str) -> Result<Option<LocusRecord>, StoreError> {
        Ok(self.loci.get(id).cloned())
    }

    fn find_locus(&self, dialogue_id: &str, path: &LocusPath) -> Result<Option<LocusRecord>, StoreError> {
        Ok(self
            .by_path
            .get(&(dialogue_id.to_string(), path.clone()))
            .and_then(|id| self.loci.get(id))
            .cloned())
    }

    fn acts(&self, design_id: &str) -> Result<Vec<ActRecord>, StoreError> {
        let mut acts: Vec<ActRecord> = self.acts.values().filter(|a| a.design_id == design_id).cloned().collect();
        acts.sort_by_key(|a| a.order_in_design);
        Ok(acts)
    }

    fn commit(&mut self, batch: WriteBatch) -> Result<(), StoreError> {
        self.validate(&batch)?;
        debug!(
            "Committing {} loci, {} designs, {} acts",
            batch.loci.len(),
            batch.designs.len(),
            batch.acts.len()
        );
        for locus in batch.loci {
            self.by_path
                .insert((locus.dialogue_id.clone(), locus.path.clone()), locus.id.clone());
            self.loci.insert(locus.id.clone(), locus);
        }
        for design in batch.designs {
            self.designs.insert(design.id.clone(), design);
        }
        for act in batch.acts {
            self.acts.insert(act.id.clone(), act);
        }
        Ok(())
    }
}
