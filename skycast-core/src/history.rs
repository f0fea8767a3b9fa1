//! Recent-search history: bounded, deduplicated, newest-first.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{model::RecentSearchRecord, store::KeyValueStore};

/// Storage key holding the serialized history.
pub const HISTORY_KEY: &str = "recent_searches";

/// Maximum number of records kept.
pub const HISTORY_CAPACITY: usize = 6;

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoredHistory {
    version: u32,
    entries: Vec<RecentSearchRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredLayout {
    Versioned(StoredHistory),
    // Unversioned array written by earlier clients.
    Legacy(Vec<RecentSearchRecord>),
}

/// History of past lookups backed by a [`KeyValueStore`].
///
/// There is no in-memory copy: every read re-parses the store, so two
/// handles over the same store always agree.
#[derive(Debug, Clone)]
pub struct RecentSearchCache {
    store: Arc<dyn KeyValueStore>,
}

impl RecentSearchCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Insert `entry` at the front, replacing any record for the same
    /// location and evicting the oldest records beyond capacity.
    ///
    /// Storage failures are logged and swallowed.
    pub fn record(&self, entry: RecentSearchRecord) {
        let mut entries = self.list();
        entries.retain(|existing| !existing.same_location(&entry));
        entries.insert(0, entry);
        entries.truncate(HISTORY_CAPACITY);

        self.persist(entries);
    }

    /// Current history, newest first. Missing or unreadable data reads as empty.
    pub fn list(&self) -> Vec<RecentSearchRecord> {
        let raw = match self.store.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "could not read recent searches; treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<StoredLayout>(&raw) {
            Ok(StoredLayout::Versioned(stored)) if stored.version == FORMAT_VERSION => {
                stored.entries
            }
            Ok(StoredLayout::Versioned(stored)) => {
                warn!(version = stored.version, "unsupported recent searches format; ignoring");
                Vec::new()
            }
            Ok(StoredLayout::Legacy(entries)) => {
                debug!(count = entries.len(), "read unversioned recent searches");
                entries
            }
            Err(e) => {
                warn!(error = %e, "malformed recent searches; treating as empty");
                Vec::new()
            }
        }
    }

    /// Remove all history. Idempotent.
    pub fn clear(&self) {
        if let Err(e) = self.store.remove(HISTORY_KEY) {
            warn!(error = %e, "could not clear recent searches");
        }
    }

    fn persist(&self, entries: Vec<RecentSearchRecord>) {
        let stored = StoredHistory { version: FORMAT_VERSION, entries };

        let json = match serde_json::to_string(&stored) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "could not serialize recent searches");
                return;
            }
        };

        if let Err(e) = self.store.set(HISTORY_KEY, &json) {
            warn!(error = %e, "could not persist recent searches");
        }
    }
}
