use anyhow::Result;
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::sync::Arc;

/// Trait for simple key-value storage modules.
///
/// Provides default implementations for the byte-level operations.
/// Implementors only need to specify the table definition and database reference.
pub trait SimpleStorage: Send + Sync {
    /// The table definition for this storage type.
    const TABLE: TableDefinition<'static, &'static str, &'static [u8]>;

    /// Get reference to the database.
    fn db(&self) -> &Arc<Database>;

    /// Store raw bytes by key.
    fn put_raw(&self, key: &str, data: &[u8]) -> Result<()> {
        self.put_many(&[(key, data)])
    }

    /// Store several entries in one write transaction.
    fn put_many(&self, entries: &[(&str, &[u8])]) -> Result<()> {
        let write_txn = self.db().begin_write()?;
        {
            let mut table = write_txn.open_table(Self::TABLE)?;
            for (key, data) in entries {
                table.insert(*key, *data)?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get raw bytes by key.
    fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let read_txn = self.db().begin_read()?;
        let table = read_txn.open_table(Self::TABLE)?;

        if let Some(value) = table.get(key)? {
            Ok(Some(value.value().to_vec()))
        } else {
            Ok(None)
        }
    }

    /// Remove several keys in one write transaction, returns how many existed.
    fn remove_many(&self, keys: &[&str]) -> Result<usize> {
        let write_txn = self.db().begin_write()?;
        let mut removed = 0;
        {
            let mut table = write_txn.open_table(Self::TABLE)?;
            for key in keys {
                if table.remove(*key)?.is_some() {
                    removed += 1;
                }
            }
        }
        write_txn.commit()?;
        Ok(removed)
    }

    /// Delete by key, returns true if existed.
    fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.remove_many(&[key])? > 0)
    }

    /// List all keys.
    fn keys(&self) -> Result<Vec<String>> {
        let read_txn = self.db().begin_read()?;
        let table = read_txn.open_table(Self::TABLE)?;

        let mut keys = Vec::new();
        for item in table.iter()? {
            let (key, _) = item?;
            keys.push(key.value().to_string());
        }

        Ok(keys)
    }

    /// Count all entries.
    fn count(&self) -> Result<usize> {
        let read_txn = self.db().begin_read()?;
        let table = read_txn.open_table(Self::TABLE)?;
        Ok(table.len()? as usize)
    }
}

/// Macro to generate a simple storage struct with common implementations.
#[macro_export]
macro_rules! define_simple_storage {
    ( $(#[$meta:meta])* $vis:vis struct $name:ident { table: $table_name:literal } ) => {
        const TABLE: redb::TableDefinition<'static, &'static str, &'static [u8]> =
            redb::TableDefinition::new($table_name);

        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            db: std::sync::Arc<redb::Database>,
        }

        impl $name {
            pub fn new(db: std::sync::Arc<redb::Database>) -> anyhow::Result<Self> {
                let write_txn = db.begin_write()?;
                write_txn.open_table(TABLE)?;
                write_txn.commit()?;

                Ok(Self { db })
            }

            pub fn put_raw(&self, key: &str, data: &[u8]) -> anyhow::Result<()> {
                <Self as $crate::SimpleStorage>::put_raw(self, key, data)
            }

            pub fn put_many(&self, entries: &[(&str, &[u8])]) -> anyhow::Result<()> {
                <Self as $crate::SimpleStorage>::put_many(self, entries)
            }

            pub fn get_raw(&self, key: &str) -> anyhow::Result<Option<Vec<u8>>> {
                <Self as $crate::SimpleStorage>::get_raw(self, key)
            }

            pub fn remove_many(&self, keys: &[&str]) -> anyhow::Result<usize> {
                <Self as $crate::SimpleStorage>::remove_many(self, keys)
            }

            pub fn delete(&self, key: &str) -> anyhow::Result<bool> {
                <Self as $crate::SimpleStorage>::delete(self, key)
            }

            pub fn keys(&self) -> anyhow::Result<Vec<String>> {
                <Self as $crate::SimpleStorage>::keys(self)
            }

            pub fn count(&self) -> anyhow::Result<usize> {
                <Self as $crate::SimpleStorage>::count(self)
            }
        }

        impl $crate::SimpleStorage for $name {
            const TABLE: redb::TableDefinition<'static, &'static str, &'static [u8]> = TABLE;

            fn db(&self) -> &std::sync::Arc<redb::Database> {
                &self.db
            }
        }
    };
}
