use crate::{
    error::{FinderError, Result},
    models::RecentSearchEntry,
    services::storage::{load_list, save_list, LocalStorage, RECENT_SLOT},
};
use std::sync::Arc;

pub const MAX_RECENT: usize = 8;

/// Newest-first history of submitted searches.
pub struct RecentSearchStore {
    storage: Arc<dyn LocalStorage>,
    entries: Vec<RecentSearchEntry>,
    load_anomaly: Option<FinderError>,
}

impl RecentSearchStore {
    pub fn load(storage: Arc<dyn LocalStorage>) -> Self {
        let loaded = load_list::<RecentSearchEntry>(storage.as_ref(), RECENT_SLOT);
        Self {
            storage,
            entries: loaded.items,
            load_anomaly: loaded.anomaly,
        }
    }

    pub fn load_anomaly(&self) -> Option<&FinderError> {
        self.load_anomaly.as_ref()
    }

    /// Move an equal entry to the front, or insert a new one there, then persist.
    ///
    /// Only the first `MAX_RECENT` entries are kept, in memory and on disk.
    pub fn record(&mut self, entry: RecentSearchEntry) -> Result<()> {
        if let Some(index) = self.entries.iter().position(|existing| *existing == entry) {
            self.entries.remove(index);
        }
        self.entries.insert(0, entry);

        let keep = self.entries.len().min(MAX_RECENT);
        let saved = save_list(self.storage.as_ref(), RECENT_SLOT, &self.entries[..keep]);
        self.entries.truncate(MAX_RECENT);
        saved
    }

    pub fn list(&self, max: usize) -> &[RecentSearchEntry] {
        &self.entries[..self.entries.len().min(max)]
    }

    /// Entry as shown on the recent-searches strip (1-based).
    pub fn get(&self, position: usize) -> Option<&RecentSearchEntry> {
        position
            .checked_sub(1)
            .filter(|index| *index < MAX_RECENT)
            .and_then(|index| self.entries.get(index))
    }
}
