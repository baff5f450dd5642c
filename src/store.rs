// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Key-value persistence capability and the typed adapter built over it.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::error::StorageError;

/// Persistent string key-value capability.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
    fn is_available(&self) -> bool;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

/// A value written for `key` by some other handle on the same storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalChange {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// A store that refuses every operation, like storage in a restricted context.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    fn used_bytes_except(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        if let Some(quota) = self.quota_bytes {
            if self.used_bytes_except(key) + key.len() + value.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        self.entries.remove(key);
        Ok(())
    }

    fn is_available(&self) -> bool {
        !self.unavailable
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageStatus {
    Available,
    /// Nothing survives the process; reads see no stored data.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageEvent {
    QuotaExceeded { key: String },
    WriteFailed { key: String, reason: String },
}

type EventHandler = Box<dyn FnMut(&StorageEvent)>;

/// Typed JSON access over a [`KeyValueStore`].
///
/// Write failures never undo in-memory state held by callers: they are reported to
/// subscribers and returned, and it is up to the caller whether to care.
pub struct RecordStore<S> {
    backend: S,
    status: StorageStatus,
    listeners: Vec<EventHandler>,
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn new(backend: S) -> Self {
        let status = if backend.is_available() {
            StorageStatus::Available
        } else {
            warn!("persistent storage is unavailable; data will only live in memory");
            StorageStatus::Unavailable
        };
        Self {
            backend,
            status,
            listeners: Vec::new(),
        }
    }

    pub fn status(&self) -> StorageStatus {
        self.status
    }

    pub fn is_available(&self) -> bool {
        self.status == StorageStatus::Available
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    pub fn on_storage_event(&mut self, handler: impl FnMut(&StorageEvent) + 'static) {
        self.listeners.push(Box::new(handler));
    }

    pub fn get_raw(&self, key: &str) -> Option<String> {
        if !self.is_available() {
            return None;
        }
        match self.backend.get(key) {
            Ok(v) => v,
            Err(e) => {
                error!(key, error = %e, "failed to read stored value");
                None
            }
        }
    }

    /// Reads and decodes `key`. Corrupted values are deleted and read as absent.
    pub fn load<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let raw = self.get_raw(key)?;
        match serde_json::from_str::<T>(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                error!(key, error = %e, "corrupted stored data; clearing it");
                if let Err(e) = self.backend.remove(key) {
                    warn!(key, error = %e, "could not clear corrupted data");
                }
                None
            }
        }
    }

    pub fn load_or<T: DeserializeOwned>(&mut self, key: &str, initial: T) -> T {
        self.load(key).unwrap_or(initial)
    }

    pub fn save<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|e| StorageError::Backend(e.to_string()))?;
        self.set_raw(key, &raw)
    }

    pub fn set_raw(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if !self.is_available() {
            return Ok(());
        }
        debug!(key, bytes = value.len(), "persisting");
        self.backend.set(key, value).map_err(|e| {
            let event = match &e {
                StorageError::QuotaExceeded { key } => {
                    warn!(key = key.as_str(), "storage quota exceeded; data only kept in memory");
                    StorageEvent::QuotaExceeded { key: key.clone() }
                }
                other => {
                    error!(key, error = %other, "failed to persist value");
                    StorageEvent::WriteFailed {
                        key: key.to_string(),
                        reason: other.to_string(),
                    }
                }
            };
            self.emit(&event);
            e
        })
    }

    pub fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        if !self.is_available() {
            return Ok(());
        }
        self.backend.remove(key)
    }

    fn emit(&mut self, event: &StorageEvent) {
        for listener in self.listeners.iter_mut() {
            listener(event);
        }
    }
}

/// Decodes a value delivered by another process; `None` when it does not parse.
pub fn decode_external<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(v) => Some(v),
        Err(e) => {
            error!(key, error = %e, "ignoring unparseable external update");
            None
        }
    }
}
