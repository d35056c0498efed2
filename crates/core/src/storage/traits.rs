//! Storage traits
//!
//! These traits define the storage interface, allowing for different
//! implementations (SQLite, in-memory, a browser bridge).

use crate::models::MatchHistoryRecord;

/// Durable key/value store holding serialized match data
///
/// Implementations never surface their failures: they log them and answer
/// with `false` or `None`, so scoring carries on when storage misbehaves.
pub trait KeyValueStore {
    /// Store `value` under `key`, replacing any previous value
    fn put(&self, key: &str, value: &str) -> bool;

    /// Stored value, or `None` when absent or unreadable
    fn get(&self, key: &str) -> Option<String>;

    /// Keys starting with `prefix`, sorted
    fn list_keys_by_prefix(&self, prefix: &str) -> Vec<String>;

    /// Delete `key`; true when the store accepted the removal
    fn remove(&self, key: &str) -> bool;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn put(&self, key: &str, value: &str) -> bool {
        (**self).put(key, value)
    }

    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn list_keys_by_prefix(&self, prefix: &str) -> Vec<String> {
        (**self).list_keys_by_prefix(prefix)
    }

    fn remove(&self, key: &str) -> bool {
        (**self).remove(key)
    }
}

/// Archived match operations
pub trait MatchRepository {
    /// Archive a match; returns its key
    fn save(&self, record: &MatchHistoryRecord) -> Option<String>;

    /// All archived matches, newest first
    fn find_all(&self) -> Vec<MatchHistoryRecord>;

    /// Delete one archived match
    fn delete(&self, id: &str) -> bool;

    /// Delete every archived match; returns how many were removed
    fn delete_all(&self) -> usize;
}
