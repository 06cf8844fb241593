//! Entry store backends
//!
//! A store persists the whole entry collection at once. Both backends keep
//! the collection as a mapping from positional index (`"0"`, `"1"`, ...) to a
//! `{date, odometer}` record.

mod json;
mod memory;

pub use json::{JsonFileStore, DEFAULT_STORE_KEY};
pub use memory::{MemoryStore, DEFAULT_STORE_PATH};

use crate::types::{Entry, Result};
use std::collections::BTreeMap;

/// Persistence collaborator for the ledger
pub trait EntryStore {
    /// Load the stored collection, in any order
    fn load(&mut self) -> Result<Vec<Entry>>;

    /// Overwrite the stored collection
    fn save(&mut self, entries: &[Entry]) -> Result<()>;

    /// Remove the stored collection
    fn clear(&mut self) -> Result<()>;
}

/// Stored form of a collection: positional index -> record
pub(crate) type IndexedRecords = BTreeMap<String, Entry>;

pub(crate) fn to_indexed(entries: &[Entry]) -> IndexedRecords {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| (i.to_string(), *entry))
        .collect()
}

/// Records in positional order (`"10"` sorts after `"9"`)
pub(crate) fn from_indexed(records: IndexedRecords) -> Vec<Entry> {
    let mut indexed: Vec<(u64, Entry)> = Vec::with_capacity(records.len());
    let mut unkeyed = Vec::new();
    for (key, entry) in records {
        match key.parse::<u64>() {
            Ok(idx) => indexed.push((idx, entry)),
            Err(_) => {
                log::debug!("Store record with non-numeric key '{}'", key);
                unkeyed.push(entry);
            }
        }
    }
    indexed.sort_by_key(|(idx, _)| *idx);
    indexed
        .into_iter()
        .map(|(_, entry)| entry)
        .chain(unkeyed)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_indexed_order_is_numeric() {
        let entries: Vec<Entry> = (0..12)
            .map(|i| {
                Entry::new(
                    NaiveDate::from_ymd_opt(2025, 8, 1 + i).unwrap(),
                    i * 100,
                )
            })
            .collect();
        let records = to_indexed(&entries);
        assert!(records.contains_key("11"));
        assert_eq!(from_indexed(records), entries);
    }
}
