//! Local JSON key/value store

use super::{from_indexed, to_indexed, EntryStore, IndexedRecords};
use crate::types::{Entry, LedgerError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Key the collection is stored under unless configured otherwise
pub const DEFAULT_STORE_KEY: &str = "leaseMileageEntries";

/// A JSON document on disk mapping keys to stored collections
///
/// Other keys in the document are preserved on save and clear.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    key: String,
}

impl JsonFileStore {
    /// Open a store at `path` using the default key
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_key(path, DEFAULT_STORE_KEY)
    }

    /// Open a store at `path` under a custom key
    pub fn with_key(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn read_document(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            log::debug!("Store file {:?} does not exist yet", self.path);
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            other => Err(LedgerError::Store(format!(
                "expected a JSON object in {:?}, found {}",
                self.path,
                json_kind(&other)
            ))),
        }
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(document)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl EntryStore for JsonFileStore {
    fn load(&mut self) -> Result<Vec<Entry>> {
        let mut document = self.read_document()?;
        let entries = match document.remove(&self.key) {
            None | Some(Value::Null) => Vec::new(),
            // Older documents may hold a plain array of records.
            Some(Value::Array(items)) => serde_json::from_value(Value::Array(items))?,
            Some(value) => from_indexed(serde_json::from_value::<IndexedRecords>(value)?),
        };
        log::info!("Loaded {} entries from {:?}", entries.len(), self.path);
        Ok(entries)
    }

    fn save(&mut self, entries: &[Entry]) -> Result<()> {
        let mut document = self.read_document()?;
        document.insert(self.key.clone(), serde_json::to_value(to_indexed(entries))?);
        self.write_document(&document)?;
        log::info!("Saved {} entries to {:?}", entries.len(), self.path);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let mut document = self.read_document()?;
        if document.remove(&self.key).is_some() {
            self.write_document(&document)?;
        }
        log::info!("Cleared stored entries in {:?}", self.path);
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn entry(day: u32, odometer: u32) -> Entry {
        Entry::new(NaiveDate::from_ymd_opt(2025, 8, day).unwrap(), odometer)
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("missing.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_writes_indexed_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = JsonFileStore::new(&path);
        store.save(&[entry(1, 100), entry(2, 150)]).unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            raw[DEFAULT_STORE_KEY]["1"],
            serde_json::json!({"date": "2025-08-02", "odometer": 150})
        );
        assert_eq!(store.load().unwrap(), vec![entry(1, 100), entry(2, 150)]);
    }

    #[test]
    fn test_other_keys_survive_clear() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let mut store = JsonFileStore::new(&path);
        store.save(&[entry(1, 100)]).unwrap();
        store.clear().unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"theme": "dark"}));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_loads_plain_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(
            &path,
            r#"{"leaseMileageEntries": [{"date": "2025-08-01", "odometer": 5}]}"#,
        )
        .unwrap();
        let mut store = JsonFileStore::new(&path);
        assert_eq!(store.load().unwrap(), vec![entry(1, 5)]);
    }

    #[test]
    fn test_rejects_non_object_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        let mut store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(LedgerError::Store(_))));
    }
}
