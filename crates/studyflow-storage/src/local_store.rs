//! Local storage - persistent string key-value store shared by the client.
//!
//! Values are stored as UTF-8 text, JSON documents are serialized on top.
//! Unreadable values (invalid UTF-8 or JSON) read as absent.

use crate::define_simple_storage;
use anyhow::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

define_simple_storage! {
    /// Persistent key-value store with string values.
    pub struct LocalStorage { table: "local_storage" }
}

impl LocalStorage {
    /// Read a string value.
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        let Some(raw) = self.get_raw(key)? else {
            return Ok(None);
        };

        match String::from_utf8(raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "Ignoring non UTF-8 value in local storage");
                Ok(None)
            }
        }
    }

    /// Write a string value, replacing any previous one.
    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.put_raw(key, value.as_bytes())
    }

    /// Write several string values in one transaction.
    pub fn set_items(&self, entries: &[(&str, &str)]) -> Result<()> {
        let raw: Vec<(&str, &[u8])> = entries
            .iter()
            .map(|(key, value)| (*key, value.as_bytes()))
            .collect();
        self.put_many(&raw)
    }

    /// Remove a value, returns true if it existed.
    pub fn remove_item(&self, key: &str) -> Result<bool> {
        self.delete(key)
    }

    /// Read and deserialize a JSON value.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(text) = self.get_item(key)? else {
            return Ok(None);
        };

        match serde_json::from_str(&text) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "Ignoring malformed JSON in local storage");
                Ok(None)
            }
        }
    }

    /// Serialize and write a JSON value.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.set_item(key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redb::Database;
    use serde::Deserialize;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn setup() -> (LocalStorage, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(Database::create(db_path).unwrap());
        let storage = LocalStorage::new(db).unwrap();
        (storage, temp_dir)
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    #[test]
    fn test_set_and_get_item() {
        let (storage, _temp_dir) = setup();

        storage.set_item("accessToken", "tok1").unwrap();
        assert_eq!(storage.get_item("accessToken").unwrap(), Some("tok1".to_string()));

        storage.set_item("accessToken", "tok2").unwrap();
        assert_eq!(storage.get_item("accessToken").unwrap(), Some("tok2".to_string()));
    }

    #[test]
    fn test_set_items_writes_every_entry() {
        let (storage, _temp_dir) = setup();

        storage.set_item("accessToken", "tok1").unwrap();
        storage
            .set_items(&[("accessToken", "tok2"), ("refreshToken", "r2")])
            .unwrap();

        assert_eq!(storage.get_item("accessToken").unwrap(), Some("tok2".to_string()));
        assert_eq!(storage.get_item("refreshToken").unwrap(), Some("r2".to_string()));
        assert_eq!(storage.count().unwrap(), 2);
    }

    #[test]
    fn test_remove_item() {
        let (storage, _temp_dir) = setup();

        storage.set_item("refreshToken", "r1").unwrap();
        assert!(storage.remove_item("refreshToken").unwrap());
        assert!(!storage.remove_item("refreshToken").unwrap());
        assert_eq!(storage.get_item("refreshToken").unwrap(), None);
    }

    #[test]
    fn test_remove_many_counts_existing_keys() {
        let (storage, _temp_dir) = setup();

        storage.set_item("a", "1").unwrap();
        storage.set_item("b", "2").unwrap();

        let removed = storage.remove_many(&["a", "b", "c"]).unwrap();
        assert_eq!(removed, 2);
        assert_eq!(storage.count().unwrap(), 0);
    }

    #[test]
    fn test_json_values() {
        let (storage, _temp_dir) = setup();

        let sample = Sample {
            name: "ada".to_string(),
            count: 3,
        };
        storage.set_json("sample", &sample).unwrap();

        let loaded: Option<Sample> = storage.get_json("sample").unwrap();
        assert_eq!(loaded, Some(sample));
    }

    #[test]
    fn test_malformed_json_reads_as_absent() {
        let (storage, _temp_dir) = setup();

        storage.set_item("users", "{not json").unwrap();

        let loaded: Option<Vec<Sample>> = storage.get_json("users").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_invalid_utf8_reads_as_absent() {
        let (storage, _temp_dir) = setup();

        storage.put_raw("binary", &[0xff, 0xfe, 0xfd]).unwrap();
        assert_eq!(storage.get_item("binary").unwrap(), None);
    }

    #[test]
    fn test_keys_lists_everything() {
        let (storage, _temp_dir) = setup();

        storage.set_item("users", "[]").unwrap();
        storage.set_item("loggedInUser", "{}").unwrap();

        let mut keys = storage.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["loggedInUser".to_string(), "users".to_string()]);
    }
}
