//! Storage layer for Courtside
//!
//! Matches are kept as JSON documents in a key/value store. `Database` backs the
//! store with SQLite; `MemoryStore` keeps everything in memory.

mod archive;
mod backup;
mod kv;
mod memory;
mod migrations;
mod traits;

use rusqlite::Connection;
use std::path::Path;
use tracing::{instrument, warn};

use crate::error::Result;

pub use archive::MatchArchive;
pub use backup::{export_document, import_document, BACKUP_KEY_PREFIX};
pub use kv::KvStore;
pub use memory::MemoryStore;
pub use traits::{KeyValueStore, MatchRepository};

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        migrations::current_version(&self.conn).unwrap_or(0)
    }

    /// Get key/value entry store
    pub fn kv(&self) -> KvStore<'_> {
        KvStore::new(&self.conn)
    }
}

// Failures are logged and reported as sentinels; scoring never stops on storage errors

impl KeyValueStore for Database {
    fn put(&self, key: &str, value: &str) -> bool {
        match self.kv().put(key, value) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "Failed to store entry");
                false
            }
        }
    }

    fn get(&self, key: &str) -> Option<String> {
        self.kv().get(key).unwrap_or_else(|e| {
            warn!(key, error = %e, "Failed to load entry");
            None
        })
    }

    fn list_keys_by_prefix(&self, prefix: &str) -> Vec<String> {
        self.kv().keys_with_prefix(prefix).unwrap_or_else(|e| {
            warn!(prefix, error = %e, "Failed to list entries");
            Vec::new()
        })
    }

    fn remove(&self, key: &str) -> bool {
        match self.kv().remove(key) {
            Ok(_) => true,
            Err(e) => {
                warn!(key, error = %e, "Failed to delete entry");
                false
            }
        }
    }
}
