//! In-memory path-addressed snapshot store

use super::{from_indexed, to_indexed, EntryStore, IndexedRecords};
use crate::types::{Entry, Result};
use std::collections::HashMap;

/// Path used when none is given
pub const DEFAULT_STORE_PATH: &str = "entries/shared";

/// Snapshot store addressed by path, like a synced remote database
///
/// Every save replaces the snapshot at the store's path; loads return the last
/// snapshot saved there.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    path: String,
    snapshots: HashMap<String, IndexedRecords>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::at_path(DEFAULT_STORE_PATH)
    }

    /// Empty store addressed at `path`
    pub fn at_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            snapshots: HashMap::new(),
        }
    }

    /// Same snapshots, addressed at another path
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Install an externally produced snapshot at the current path
    pub fn push_snapshot(&mut self, entries: &[Entry]) {
        self.snapshots.insert(self.path.clone(), to_indexed(entries));
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryStore for MemoryStore {
    fn load(&mut self) -> Result<Vec<Entry>> {
        let entries = self
            .snapshots
            .get(&self.path)
            .cloned()
            .map(from_indexed)
            .unwrap_or_default();
        log::debug!("Loaded {} entries from '{}'", entries.len(), self.path);
        Ok(entries)
    }

    fn save(&mut self, entries: &[Entry]) -> Result<()> {
        self.push_snapshot(entries);
        log::debug!("Saved {} entries to '{}'", entries.len(), self.path);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.snapshots.remove(&self.path);
        log::debug!("Removed snapshot at '{}'", self.path);
        Ok(())
    }
}
