//! Credential store - the access/refresh pair kept in local storage.

use super::types::{ACCESS_TOKEN_KEY, CredentialPair, LOGGED_IN_USER_KEY, REFRESH_TOKEN_KEY};
use anyhow::Result;
use studyflow_storage::LocalStorage;
use tracing::debug;

/// Reads and writes the two token keys. Empty values read as absent.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    storage: LocalStorage,
}

impl CredentialStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn access_token(&self) -> Result<Option<String>> {
        self.read(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Result<Option<String>> {
        self.read(REFRESH_TOKEN_KEY)
    }

    pub fn set_access_token(&self, token: &str) -> Result<()> {
        self.storage.set_item(ACCESS_TOKEN_KEY, token)
    }

    /// Replace both tokens in one write.
    pub fn set_pair(&self, pair: &CredentialPair) -> Result<()> {
        self.storage.set_items(&[
            (ACCESS_TOKEN_KEY, pair.access_token.as_str()),
            (REFRESH_TOKEN_KEY, pair.refresh_token.as_str()),
        ])
    }

    /// Both tokens, if both are present.
    pub fn pair(&self) -> Result<Option<CredentialPair>> {
        match (self.access_token()?, self.refresh_token()?) {
            (Some(access), Some(refresh)) => Ok(Some(CredentialPair::new(access, refresh))),
            _ => Ok(None),
        }
    }

    /// Drop both tokens and the signed-in user.
    pub fn clear(&self) -> Result<()> {
        let removed = self
            .storage
            .remove_many(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, LOGGED_IN_USER_KEY])?;
        debug!(removed, "Cleared stored credentials");
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .storage
            .get_item(key)?
            .filter(|value| !value.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studyflow_storage::Storage;
    use tempfile::tempdir;

    fn setup() -> (CredentialStore, Storage, tempfile::TempDir) {
        let temp_dir = tempdir().unwrap();
        let storage = Storage::new(temp_dir.path().join("test.db")).unwrap();
        let store = CredentialStore::new(storage.local.clone());
        (store, storage, temp_dir)
    }

    #[test]
    fn test_set_pair_and_read_back() {
        let (store, _storage, _temp_dir) = setup();

        store.set_pair(&CredentialPair::new("tok1", "r1")).unwrap();

        assert_eq!(store.access_token().unwrap(), Some("tok1".to_string()));
        assert_eq!(store.refresh_token().unwrap(), Some("r1".to_string()));
        assert_eq!(store.pair().unwrap(), Some(CredentialPair::new("tok1", "r1")));
    }

    #[test]
    fn test_set_pair_replaces_both_tokens() {
        let (store, storage, _temp_dir) = setup();

        store.set_pair(&CredentialPair::new("tok1", "r1")).unwrap();
        store.set_pair(&CredentialPair::new("tok9", "r9")).unwrap();

        assert_eq!(store.pair().unwrap(), Some(CredentialPair::new("tok9", "r9")));
        assert_eq!(storage.local.count().unwrap(), 2);
    }

    #[test]
    fn test_set_access_token_keeps_refresh_token() {
        let (store, _storage, _temp_dir) = setup();

        store.set_pair(&CredentialPair::new("tok1", "r1")).unwrap();
        store.set_access_token("tok2").unwrap();

        assert_eq!(store.access_token().unwrap(), Some("tok2".to_string()));
        assert_eq!(store.refresh_token().unwrap(), Some("r1".to_string()));
    }

    #[test]
    fn test_clear_removes_logged_in_user() {
        let (store, storage, _temp_dir) = setup();

        store.set_pair(&CredentialPair::new("tok1", "r1")).unwrap();
        storage.local.set_item(LOGGED_IN_USER_KEY, "{}").unwrap();
        storage.local.set_item("users", "[]").unwrap();

        store.clear().unwrap();

        assert_eq!(store.pair().unwrap(), None);
        assert_eq!(storage.local.get_item(LOGGED_IN_USER_KEY).unwrap(), None);
        assert_eq!(storage.local.get_item("users").unwrap(), Some("[]".to_string()));
    }

    #[test]
    fn test_empty_token_reads_as_absent() {
        let (store, storage, _temp_dir) = setup();

        storage.local.set_item(REFRESH_TOKEN_KEY, "").unwrap();
        assert_eq!(store.refresh_token().unwrap(), None);
    }
}
