//! Durable key-value storage for the presentation position.
//!
//! Persistence is best-effort: reads fall back to defaults on anything
//! suspicious and writes never propagate failures to the interactive path.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const CURRENT_SLIDE_KEY: &str = "current-slide";
pub const SLIDE_STATES_KEY: &str = "slide-states";

const APP_DIR: &str = "statedeck";
const STATE_DIR: &str = "state";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String key-value storage, shaped like browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Volatile storage, used for exports and `--fresh`-style throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One JSON object of string values per deck, rewritten on every change.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`. Unreadable or corrupt files
    /// are treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), "ignoring corrupt state file: {e}");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no saved state yet");
                BTreeMap::new()
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "cannot read state file: {e}");
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    /// Default location for a deck's saved position:
    /// `<data_dir>/statedeck/state/<deck-stem>.json`.
    pub fn default_path(deck: &Path) -> anyhow::Result<PathBuf> {
        let stem = deck
            .file_stem()
            .ok_or_else(|| anyhow::anyhow!("Deck path has no file name: {}", deck.display()))?;
        let mut name = stem.to_os_string();
        name.push(".json");
        dirs::data_dir()
            .map(|d| d.join(APP_DIR).join(STATE_DIR).join(name))
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))
    }

    /// `explicit` when given, otherwise [`FileStore::default_path`].
    pub fn resolve_path(deck: &Path, explicit: Option<PathBuf>) -> anyhow::Result<PathBuf> {
        match explicit {
            Some(path) => Ok(path),
            None => Self::default_path(deck),
        }
    }

    fn flush(&self) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, json).map_err(write_err)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Typed access to the two persisted entries.
#[derive(Debug)]
pub struct PersistenceStore<S> {
    backend: S,
}

impl<S: KeyValueStore> PersistenceStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Saved slide index, or 0 when absent, unparsable or outside `[0, count)`.
    pub fn load_current_slide(&self, count: usize) -> usize {
        self.backend
            .get(CURRENT_SLIDE_KEY)
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|&index| index < count)
            .unwrap_or(0)
    }

    /// Saved state array, or all zeros when absent, malformed or of the wrong
    /// length. A length mismatch means the deck changed since it was saved.
    pub fn load_slide_states(&self, count: usize) -> Vec<usize> {
        let Some(raw) = self.backend.get(SLIDE_STATES_KEY) else {
            return vec![0; count];
        };
        match serde_json::from_str::<Vec<usize>>(&raw) {
            Ok(states) if states.len() == count => states,
            Ok(states) => {
                tracing::debug!(
                    saved = states.len(),
                    expected = count,
                    "discarding saved slide states of the wrong length"
                );
                vec![0; count]
            }
            Err(e) => {
                tracing::debug!("discarding malformed slide states: {e}");
                vec![0; count]
            }
        }
    }

    pub fn save_current_slide(&mut self, index: usize) {
        if let Err(e) = self.backend.set(CURRENT_SLIDE_KEY, index.to_string()) {
            tracing::warn!("could not save current slide: {e}");
        }
    }

    pub fn save_slide_states(&mut self, states: &[usize]) {
        let result = serde_json::to_string(states)
            .map_err(StoreError::from)
            .and_then(|json| self.backend.set(SLIDE_STATES_KEY, json));
        if let Err(e) = result {
            tracing::warn!("could not save slide states: {e}");
        }
    }

    pub fn clear_all(&mut self) {
        for key in [CURRENT_SLIDE_KEY, SLIDE_STATES_KEY] {
            if let Err(e) = self.backend.remove(key) {
                tracing::warn!(key, "could not clear saved state: {e}");
            }
        }
    }

    #[cfg(test)]
    pub fn backend(&self) -> &S {
        &self.backend
    }
}
