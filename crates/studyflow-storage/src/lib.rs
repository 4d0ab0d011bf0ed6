//! StudyFlow Storage - Low-level storage abstraction layer
//!
//! This crate provides the persistence layer for the StudyFlow client, using
//! redb as the embedded database. It plays the role browser-local storage
//! played for the web client: a flat string key-value space that survives
//! restarts.
//!
//! # Tables
//!
//! - `local_storage` - Client key-value pairs (tokens, users, signed-in user)

pub mod local_store;
mod simple_storage;

use anyhow::Result;
use redb::Database;
use std::path::Path;
use std::sync::Arc;

pub use local_store::LocalStorage;
pub use simple_storage::SimpleStorage;

/// Central storage manager that initializes all storage subsystems
pub struct Storage {
    db: Arc<Database>,
    pub local: LocalStorage,
}

impl Storage {
    /// Create a new storage instance at the given path.
    ///
    /// This will create the database file if it doesn't exist and initialize
    /// all required tables.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let db = Arc::new(Database::create(path.as_ref())?);
        let local = LocalStorage::new(db.clone())?;

        Ok(Self { db, local })
    }

    /// Get a reference to the underlying database
    pub fn get_db(&self) -> Arc<Database> {
        self.db.clone()
    }
}
