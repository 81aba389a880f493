use crate::{
    error::{FinderError, Result},
    models::{Document, FavoriteEntry},
    services::storage::{load_list, save_list, LocalStorage, FAVORITES_SLOT},
};
use std::sync::Arc;
use tracing::{debug, info};

/// Persisted favorites, in the order they were added.
pub struct FavoritesStore {
    storage: Arc<dyn LocalStorage>,
    entries: Vec<FavoriteEntry>,
    load_anomaly: Option<FinderError>,
}

impl FavoritesStore {
    /// Read the favorites slot once. Corrupt data starts an empty list.
    pub fn load(storage: Arc<dyn LocalStorage>) -> Self {
        let loaded = load_list::<FavoriteEntry>(storage.as_ref(), FAVORITES_SLOT);
        let mut entries: Vec<FavoriteEntry> = Vec::with_capacity(loaded.items.len());
        for entry in loaded.items {
            if !entries.iter().any(|existing| existing.key == entry.key) {
                entries.push(entry);
            }
        }
        info!("Loaded {} favorites", entries.len());

        Self {
            storage,
            entries,
            load_anomaly: loaded.anomaly,
        }
    }

    /// Why the stored list was discarded at load time, if it was.
    pub fn load_anomaly(&self) -> Option<&FinderError> {
        self.load_anomaly.as_ref()
    }

    pub fn is_favorite(&self, doc: &Document) -> bool {
        let key = doc.identity();
        self.entries.iter().any(|entry| entry.key == key)
    }

    /// Add the document if absent, remove it if present, then persist.
    ///
    /// Returns the new membership. The in-memory list keeps the change even
    /// when persisting fails.
    pub fn toggle(&mut self, doc: &Document) -> Result<bool> {
        let key = doc.identity();
        let now_favorite = match self.entries.iter().position(|entry| entry.key == key) {
            Some(index) => {
                self.entries.remove(index);
                false
            }
            None => {
                self.entries.push(FavoriteEntry::from_document(doc));
                true
            }
        };
        debug!("Favorite '{}' is now {}", key, now_favorite);

        save_list(self.storage.as_ref(), FAVORITES_SLOT, &self.entries)?;
        Ok(now_favorite)
    }

    pub fn list(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
