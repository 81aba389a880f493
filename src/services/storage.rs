use crate::error::{FinderError, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::RwLock,
};
use tracing::{debug, warn};

pub const FAVORITES_SLOT: &str = "favorites";
pub const RECENT_SLOT: &str = "recent";

/// Durable string slots keyed by name.
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, slot: &str) -> Result<Option<String>>;
    fn set_item(&self, slot: &str, value: &str) -> Result<()>;
}

/// One `<slot>.json` file per slot inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            FinderError::Storage(format!("Cannot create {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{}.json", slot))
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, slot: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.slot_path(slot)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, slot: &str, value: &str) -> Result<()> {
        let path = self.slot_path(slot);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        debug!("Wrote slot '{}' to {}", slot, path.display());
        Ok(())
    }
}

/// Volatile storage, used when nothing should touch the disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(slot: &str, value: &str) -> Self {
        let storage = Self::new();
        if let Ok(mut slots) = storage.slots.write() {
            slots.insert(slot.to_string(), value.to_string());
        }
        storage
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, slot: &str) -> Result<Option<String>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| FinderError::Storage("memory storage lock poisoned".to_string()))?;
        Ok(slots.get(slot).cloned())
    }

    fn set_item(&self, slot: &str, value: &str) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| FinderError::Storage("memory storage lock poisoned".to_string()))?;
        slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }
}

/// A list read back from a slot, plus the reason it had to be discarded, if any.
#[derive(Debug)]
pub struct LoadedSlot<T> {
    pub items: Vec<T>,
    pub anomaly: Option<FinderError>,
}

/// Read a JSON array from `slot`. Absent slots are empty; unreadable ones are
/// empty too, with the failure kept in `anomaly` instead of being returned.
pub fn load_list<T: DeserializeOwned>(storage: &dyn LocalStorage, slot: &str) -> LoadedSlot<T> {
    let raw = match storage.get_item(slot) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("Could not read slot '{}': {}", slot, e);
            return LoadedSlot {
                items: Vec::new(),
                anomaly: Some(FinderError::StorageCorrupt {
                    slot: slot.to_string(),
                    reason: e.to_string(),
                }),
            };
        }
    };

    let raw = match raw.as_deref().map(str::trim) {
        None | Some("") => {
            return LoadedSlot {
                items: Vec::new(),
                anomaly: None,
            }
        }
        Some(raw) => raw,
    };

    match serde_json::from_str::<Vec<T>>(raw) {
        Ok(items) => LoadedSlot {
            items,
            anomaly: None,
        },
        Err(e) => {
            warn!("Discarding unreadable slot '{}': {}", slot, e);
            LoadedSlot {
                items: Vec::new(),
                anomaly: Some(FinderError::StorageCorrupt {
                    slot: slot.to_string(),
                    reason: e.to_string(),
                }),
            }
        }
    }
}

pub fn save_list<T: Serialize>(storage: &dyn LocalStorage, slot: &str, items: &[T]) -> Result<()> {
    let json = serde_json::to_string(items)?;
    storage.set_item(slot, &json)
}
