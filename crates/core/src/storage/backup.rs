//! Backup documents
//!
//! A backup is one JSON object mapping every `match*` key to its stored string,
//! so the active session, the index and all archived matches travel together.
//! Importing merges the archive only: the match in play is never replaced.

use serde_json::{Map, Value};
use tracing::{info, warn};

use super::KeyValueStore;
use crate::error::{Error, Result};
use crate::models::ACTIVE_MATCH_KEY;

/// Keys included in a backup
pub const BACKUP_KEY_PREFIX: &str = "match";

/// Every backed-up entry as a pretty-printed JSON object
pub fn export_document<S: KeyValueStore + ?Sized>(store: &S) -> Result<String> {
    let mut entries = Map::new();
    for key in store.list_keys_by_prefix(BACKUP_KEY_PREFIX) {
        if let Some(value) = store.get(&key) {
            entries.insert(key, Value::String(value));
        }
    }
    info!(entries = entries.len(), "Exported backup");
    Ok(serde_json::to_string_pretty(&Value::Object(entries))?)
}

/// Merge a backup into `store`; returns how many entries were written
///
/// Existing keys not in the backup are left alone. The active session entry,
/// entries outside the backup prefix and non-string values are skipped.
pub fn import_document<S: KeyValueStore + ?Sized>(store: &S, document: &str) -> Result<usize> {
    let entries = match serde_json::from_str::<Value>(document)? {
        Value::Object(entries) => entries,
        _ => {
            return Err(Error::InvalidOperation(
                "Backup must be a JSON object of key/value entries".into(),
            ))
        }
    };

    let mut written = 0;
    for (key, value) in &entries {
        let Value::String(value) = value else {
            warn!(key, "Skipping backup entry that is not a string");
            continue;
        };
        if !key.starts_with(BACKUP_KEY_PREFIX) {
            warn!(key, "Skipping backup entry outside the match keys");
            continue;
        }
        if key == ACTIVE_MATCH_KEY {
            info!("Keeping the match in play over the backed-up one");
            continue;
        }
        if store.put(key, value) {
            written += 1;
        }
    }
    info!(written, "Imported backup");
    Ok(written)
}
