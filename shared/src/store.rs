use std::cell::RefCell;
use std::collections::HashMap;

use log::{debug, warn};
use thiserror::Error;

use crate::config::{JOINED_CLEANUP_STORAGE_KEY, STATE_STORAGE_KEY};
use crate::events::JoinedCleanup;
use crate::state::{AppState, PersistedBlob};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage write rejected: {0}")]
    WriteRejected(String),
    #[error("stored value is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// String key-value storage with `localStorage` semantics.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with one raw entry, malformed or not.
    pub fn with_raw(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.raw(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub struct StateStore<K> {
    backend: K,
}

impl<K: KeyValueStore> StateStore<K> {
    pub fn new(backend: K) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &K {
        &self.backend
    }

    fn try_load(&self) -> Result<Option<PersistedBlob>, StoreError> {
        let Some(raw) = self.backend.get_item(STATE_STORAGE_KEY)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// The saved preferences, or an empty blob when nothing usable is stored.
    pub fn load(&self) -> PersistedBlob {
        match self.try_load() {
            Ok(Some(blob)) => blob,
            Ok(None) => PersistedBlob::default(),
            Err(err) => {
                warn!("ignoring saved state: {err}");
                PersistedBlob::default()
            }
        }
    }

    fn write_json<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        self.backend.set_item(key, &json)
    }

    /// Best-effort; a failed write only costs the preference on next load.
    pub fn save(&self, state: &AppState) {
        if let Err(err) = self.write_json(STATE_STORAGE_KEY, &state.persisted()) {
            debug!("could not save state: {err}");
        }
    }

    pub fn record_join(&self, joined: &JoinedCleanup) {
        if let Err(err) = self.write_json(JOINED_CLEANUP_STORAGE_KEY, joined) {
            debug!("could not record joined cleanup: {err}");
        }
    }
}
