//! JSON-file backed store
//!
//! The whole store is one pretty-printed JSON snapshot. A commit is applied
//! to a copy, written to a sibling temp file and renamed over the original,
//! so a failed commit leaves both the file and the in-memory view untouched.

use super::{ActRecord, Design, DesignStore, LocusRecord, MemoryStore, StoreError, StoreSnapshot, WriteBatch};
use crate::locus::LocusPath;
use log::info;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open an existing store file or start an empty one at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let inner = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            let snapshot: StoreSnapshot = serde_json::from_str(&data)?;
            let store = MemoryStore::from_snapshot(snapshot)?;
            info!(
                "Loaded store {}: {} designs, {} loci, {} acts",
                path.display(),
                store.design_count(),
                store.locus_count(),
                store.act_count()
            );
            store
        } else {
            MemoryStore::new()
        };
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.inner
    }

    fn write(&self, store: &MemoryStore) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&store.snapshot())?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Persist the current state (e.g. right after `open` on a new path)
    pub fn save(&self) -> Result<(), StoreError> {
        self.write(&self.inner)
    }
}

impl DesignStore for JsonFileStore {
    fn design(&self, id: &str) -> Result<Option<Design>, StoreError> {
        self.inner.design(id)
    }

    fn locus(&self, id: &str) -> Result<Option<LocusRecord>, StoreError> {
        self.inner.locus(id)
    }

    fn find_locus(&self, dialogue_id: &str, path: &LocusPath) -> Result<Option<LocusRecord>, StoreError> {
        self.inner.find_locus(dialogue_id, path)
    }

    fn acts(&self, design_id: &str) -> Result<Vec<ActRecord>, StoreError> {
        self.inner.acts(design_id)
    }

    fn commit(&mut self, batch: WriteBatch) -> Result<(), StoreError> {
        let mut next = self.inner.clone();
        next.commit(batch)?;
        self.write(&next)?;
        self.inner = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DesignDraft;

    fn test_file() -> PathBuf {
        std::env::temp_dir()
            .join(format!("ludics-store-test-{}", uuid::Uuid::new_v4()))
            .join("store.json")
    }

    #[test]
    fn test_commit_persists() {
        let file = test_file();
        let mut store = JsonFileStore::open(&file).unwrap();
        let batch = DesignDraft::new("dlg", "Proponent")
            .id("P")
            .positive("0", &["x"])
            .stage(&store)
            .unwrap();
        store.commit(batch).unwrap();

        let reopened = JsonFileStore::open(&file).unwrap();
        assert!(reopened.design("P").unwrap().is_some());
        assert_eq!(reopened.acts("P").unwrap().len(), 1);

        let _ = std::fs::remove_dir_all(file.parent().unwrap());
    }

    #[test]
    fn test_rejected_commit_keeps_file() {
        let file = test_file();
        let mut store = JsonFileStore::open(&file).unwrap();
        let batch = DesignDraft::new("dlg", "Proponent").id("P").stage(&store).unwrap();
        store.commit(batch).unwrap();
        let before = std::fs::read_to_string(&file).unwrap();

        let again = DesignDraft::new("dlg", "Opponent").id("O").stage(&store).unwrap();
        let mut broken = again.clone();
        broken.designs[0].root_locus_id = "missing".into();
        assert!(store.commit(broken).is_err());
        assert_eq!(std::fs::read_to_string(&file).unwrap(), before);
        assert!(store.design("O").unwrap().is_none());

        let _ = std::fs::remove_dir_all(file.parent().unwrap());
    }
}
