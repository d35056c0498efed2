//! Application state management

use std::path::{Path, PathBuf};

use courtside_core::{Database, Error, KeyValueStore, MatchController, MemoryStore, Result};
use tracing::info;

use crate::config::AppConfig;

/// Where matches are kept
pub enum Backend {
    Sqlite(Database),
    Memory(MemoryStore),
}

impl KeyValueStore for Backend {
    fn put(&self, key: &str, value: &str) -> bool {
        match self {
            Backend::Sqlite(db) => db.put(key, value),
            Backend::Memory(mem) => mem.put(key, value),
        }
    }

    fn get(&self, key: &str) -> Option<String> {
        match self {
            Backend::Sqlite(db) => db.get(key),
            Backend::Memory(mem) => mem.get(key),
        }
    }

    fn list_keys_by_prefix(&self, prefix: &str) -> Vec<String> {
        match self {
            Backend::Sqlite(db) => db.list_keys_by_prefix(prefix),
            Backend::Memory(mem) => mem.list_keys_by_prefix(prefix),
        }
    }

    fn remove(&self, key: &str) -> bool {
        match self {
            Backend::Sqlite(db) => db.remove(key),
            Backend::Memory(mem) => mem.remove(key),
        }
    }
}

/// Main application state
pub struct AppState {
    pub controller: MatchController<Backend>,
    database_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self> {
        if config.in_memory {
            info!("Using in-memory store");
            return Ok(Self::with_backend(Backend::Memory(MemoryStore::new()), None));
        }

        let db_path = config.database_path().ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine data directory",
            ))
        })?;

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&db_path)?;
        info!(path = %db_path.display(), "Opened match database");
        Ok(Self::with_backend(Backend::Sqlite(db), Some(db_path)))
    }

    fn with_backend(backend: Backend, database_path: Option<PathBuf>) -> Self {
        Self {
            controller: MatchController::open(backend),
            database_path,
        }
    }

    pub fn database_path(&self) -> Option<&Path> {
        self.database_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_core::Team;

    #[test]
    fn test_in_memory_state() {
        let config = AppConfig {
            in_memory: true,
            ..AppConfig::default()
        };
        let state = AppState::new(&config).unwrap();
        assert!(state.database_path().is_none());
        assert!(matches!(state.controller.archive().store(), Backend::Memory(_)));
    }

    #[test]
    fn test_match_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            data_dir: Some(dir.path().join("nested")),
            ..AppConfig::default()
        };

        {
            let mut state = AppState::new(&config).unwrap();
            state.controller.record_rally(Team::Us);
            state.controller.record_rally(Team::Them);
        }

        let state = AppState::new(&config).unwrap();
        assert_eq!(
            state.database_path(),
            Some(dir.path().join("nested").join("courtside.db").as_path())
        );
        assert_eq!(state.controller.state().current().unwrap().score_label(), "1-1");
    }

    #[test]
    fn test_missing_data_dir_is_an_error() {
        assert!(AppState::new(&AppConfig::default()).is_err());
    }
}
