//! Key/value persistence for browser `localStorage`.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session vault and token accessor read and write through
//! [`KeyValueStore`] so they never touch web-sys directly. The browser
//! implementation is hydrate-only; [`MemoryStorage`] backs tests and browsers
//! where `localStorage` is unavailable (private mode, disabled storage).

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::HashMap;

/// Errors produced when writing to a key/value store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// No storage backend is reachable (no window, storage disabled).
    #[error("storage unavailable")]
    Unavailable,

    /// The backend refused the write (quota exceeded, security error).
    #[error("storage write failed: {0}")]
    Write(String),
}

/// Minimal string key/value store with `localStorage` semantics.
pub trait KeyValueStore {
    /// Read the raw value stored under `key`.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend rejects the write.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str);
}

/// In-process store used in tests and as a fallback when the browser has no
/// usable `localStorage`.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[cfg(test)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    #[cfg(test)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

/// `window.localStorage` accessor.
///
/// Outside the browser every read misses and every write reports
/// [`StorageError::Unavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    /// Whether `localStorage` can be reached from this context.
    #[must_use]
    pub fn is_available() -> bool {
        #[cfg(feature = "csr")]
        {
            local_storage().is_some()
        }
        #[cfg(not(feature = "csr"))]
        {
            false
        }
    }
}

#[cfg(feature = "csr")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().unwrap_or(None))
}

impl KeyValueStore for BrowserStorage {
    #[cfg_attr(not(feature = "csr"), expect(unused_variables))]
    fn get_item(&self, key: &str) -> Option<String> {
        #[cfg(feature = "csr")]
        {
            local_storage()?.get_item(key).unwrap_or(None)
        }
        #[cfg(not(feature = "csr"))]
        {
            None
        }
    }

    #[cfg_attr(not(feature = "csr"), expect(unused_variables))]
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            let storage = local_storage().ok_or(StorageError::Unavailable)?;
            storage
                .set_item(key, value)
                .map_err(|e| StorageError::Write(format!("{e:?}")))
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(StorageError::Unavailable)
        }
    }

    #[cfg_attr(not(feature = "csr"), expect(unused_variables))]
    fn remove_item(&self, key: &str) {
        #[cfg(feature = "csr")]
        {
            if let Some(storage) = local_storage() {
                if let Err(e) = storage.remove_item(key) {
                    log::warn!("localStorage remove failed for {key}: {e:?}");
                }
            }
        }
    }
}
