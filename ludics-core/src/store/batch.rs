//! Staged writes, committed atomically

use super::{ActRecord, Design, DesignStore, LocusRecord, StoreError};
use crate::locus::LocusPath;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Records to create in one all-or-nothing commit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WriteBatch {
    pub loci: Vec<LocusRecord>,
    pub designs: Vec<Design>,
    pub acts: Vec<ActRecord>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.loci.is_empty() && self.designs.is_empty() && self.acts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.loci.len() + self.designs.len() + self.acts.len()
    }

    /// Id of the locus at `path`, reusing a staged or stored one when it
    /// exists and staging it (with any missing ancestors) otherwise.
    /// A locus is only ever reused for its own path.
    pub fn ensure_locus<S: DesignStore + ?Sized>(
        &mut self,
        store: &S,
        dialogue_id: &str,
        path: &LocusPath,
    ) -> Result<String, StoreError> {
        if let Some(parent) = path.parent() {
            self.ensure_locus(store, dialogue_id, &parent)?;
        }
        if let Some(staged) = self
            .loci
            .iter()
            .find(|l| l.dialogue_id == dialogue_id && &l.path == path)
        {
            return Ok(staged.id.clone());
        }
        if let Some(existing) = store.find_locus(dialogue_id, path)? {
            return Ok(existing.id);
        }
        let record = LocusRecord {
            id: Uuid::new_v4().to_string(),
            dialogue_id: dialogue_id.to_string(),
            path: path.clone(),
        };
        let id = record.id.clone();
        self.loci.push(record);
        Ok(id)
    }

    /// Path of a locus id, looking at staged records before the store
    pub fn locus_path<S: DesignStore + ?Sized>(
        &self,
        store: &S,
        locus_id: &str,
    ) -> Result<Option<LocusPath>, StoreError> {
        if let Some(staged) = self.loci.iter().find(|l| l.id == locus_id) {
            return Ok(Some(staged.path.clone()));
        }
        Ok(store.locus(locus_id)?.map(|l| l.path))
    }
}
