//! In-memory key/value store

use std::cell::RefCell;
use std::collections::BTreeMap;

use super::KeyValueStore;

/// Key/value store kept in memory; contents are lost on drop
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn put(&self, key: &str, value: &str) -> bool {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn list_keys_by_prefix(&self, prefix: &str) -> Vec<String> {
        self.entries
            .borrow()
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect()
    }

    fn remove(&self, key: &str) -> bool {
        self.entries.borrow_mut().remove(key);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_listing_is_sorted() {
        let store = MemoryStore::new();
        for key in ["match_3", "match", "match_1", "team", "match_list"] {
            store.put(key, "{}");
        }

        assert_eq!(
            store.list_keys_by_prefix("match_"),
            vec!["match_1", "match_3", "match_list"]
        );
        assert_eq!(store.list_keys_by_prefix("zzz"), Vec::<String>::new());
    }

    #[test]
    fn test_put_get_remove() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert!(store.put("match", "1"));
        assert!(store.put("match", "2"));
        assert_eq!(store.get("match").as_deref(), Some("2"));
        assert!(store.remove("match"));
        assert_eq!(store.get("match"), None);
        assert_eq!(store.len(), 0);
    }
}
