//! Match archive over a key/value store
//!
//! Key layout: `match` holds the active session, `match_<startTime>` holds an
//! archived match and `match_list` caches the archived keys.

use tracing::{debug, info, warn};

use super::{KeyValueStore, MatchRepository};
use crate::models::{
    match_key, MatchHistoryRecord, MatchState, ACTIVE_MATCH_KEY, ARCHIVE_KEY_PREFIX,
    MATCH_INDEX_KEY,
};

fn is_reserved(key: &str) -> bool {
    key == ACTIVE_MATCH_KEY || key == MATCH_INDEX_KEY
}

/// Active session and archived matches stored in a [`KeyValueStore`]
pub struct MatchArchive<S> {
    store: S,
}

impl<S: KeyValueStore> MatchArchive<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Snapshot the match in play
    pub fn save_active(&self, state: &MatchState) -> bool {
        match serde_json::to_string(state) {
            Ok(json) => self.store.put(ACTIVE_MATCH_KEY, &json),
            Err(e) => {
                warn!(error = %e, "Failed to serialize active match");
                false
            }
        }
    }

    /// The saved match in play, if there is a readable one
    pub fn load_active(&self) -> Option<MatchState> {
        let json = self.store.get(ACTIVE_MATCH_KEY)?;
        match serde_json::from_str::<MatchState>(&json) {
            Ok(mut state) => {
                state.normalize();
                Some(state)
            }
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable active match");
                None
            }
        }
    }

    /// Write a match under its start-time key and refresh the index
    pub fn archive(&self, record: &MatchHistoryRecord) -> Option<String> {
        let key = match_key(record.start_time());
        let json = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "Failed to serialize match record");
                return None;
            }
        };

        if !self.store.put(&key, &json) {
            return None;
        }
        self.refresh_index();
        info!(key, complete = record.is_complete, "Match archived");
        Some(key)
    }

    /// Archived keys, excluding the reserved ones
    pub fn archived_keys(&self) -> Vec<String> {
        self.store
            .list_keys_by_prefix(ARCHIVE_KEY_PREFIX)
            .into_iter()
            .filter(|key| !is_reserved(key))
            .collect()
    }

    /// Rewrite the cached key index
    pub fn refresh_index(&self) -> bool {
        let keys = self.archived_keys();
        match serde_json::to_string(&keys) {
            Ok(json) => self.store.put(MATCH_INDEX_KEY, &json),
            Err(e) => {
                warn!(error = %e, "Failed to serialize match index");
                false
            }
        }
    }

    /// Cached key index as last written
    pub fn index(&self) -> Vec<String> {
        self.store
            .get(MATCH_INDEX_KEY)
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    fn read(&self, key: &str) -> Option<MatchHistoryRecord> {
        let json = self.store.get(key)?;
        match serde_json::from_str::<MatchHistoryRecord>(&json) {
            Ok(mut record) => {
                record.state.normalize();
                Some(record)
            }
            Err(e) => {
                warn!(key, error = %e, "Skipping unreadable match record");
                None
            }
        }
    }

    /// Every readable archived match, newest first
    pub fn find_all(&self) -> Vec<MatchHistoryRecord> {
        let mut records: Vec<MatchHistoryRecord> = self
            .archived_keys()
            .iter()
            .filter_map(|key| self.read(key))
            .collect();
        records.sort_by(|a, b| b.start_time().cmp(&a.start_time()));
        debug!(count = records.len(), "Loaded match history");
        records
    }

    /// One archived match by id
    pub fn find(&self, id: &str) -> Option<MatchHistoryRecord> {
        if is_reserved(id) || !id.starts_with(ARCHIVE_KEY_PREFIX) {
            return None;
        }
        self.read(id)
    }

    /// Delete one archived match
    pub fn delete(&self, id: &str) -> bool {
        if is_reserved(id) || !id.starts_with(ARCHIVE_KEY_PREFIX) || self.store.get(id).is_none() {
            return false;
        }
        let removed = self.store.remove(id);
        if removed {
            self.refresh_index();
        }
        removed
    }

    /// Delete every archived match
    pub fn delete_all(&self) -> usize {
        let removed = self
            .archived_keys()
            .iter()
            .filter(|key| self.store.remove(key))
            .count();
        self.refresh_index();
        removed
    }
}

impl<S: KeyValueStore> MatchRepository for MatchArchive<S> {
    fn save(&self, record: &MatchHistoryRecord) -> Option<String> {
        self.archive(record)
    }

    fn find_all(&self) -> Vec<MatchHistoryRecord> {
        MatchArchive::find_all(self)
    }

    fn delete(&self, id: &str) -> bool {
        MatchArchive::delete(self, id)
    }

    fn delete_all(&self) -> usize {
        MatchArchive::delete_all(self)
    }
}
