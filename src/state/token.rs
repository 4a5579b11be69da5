//! Access-token lookup against persisted storage.
//!
//! The session blob is the only place a token lives. Older builds also wrote
//! the bare token under a dedicated key; [`migrate_legacy_token`] folds that
//! value into the blob once and deletes the dedicated key.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use super::session::Session;
use crate::util::storage::{KeyValueStore, StorageError};

/// Read the access token from the session blob stored under `key`.
///
/// A missing or unreadable blob yields `None`.
pub fn access_token(storage: &dyn KeyValueStore, key: &str) -> Option<String> {
    let raw = storage.get_item(key)?;
    match Session::from_blob(&raw) {
        Ok(session) => session.token().map(str::to_owned),
        Err(e) => {
            log::debug!("session blob unreadable while reading token: {e}");
            None
        }
    }
}

/// Move a token stored under `legacy_key` into the session blob under `key`.
///
/// The blob wins when both hold a token. The legacy key is removed in every
/// case. Returns `true` when the blob was rewritten.
///
/// # Errors
///
/// Returns a [`StorageError`] if writing the migrated blob fails; the legacy
/// key is kept so the migration can be retried.
pub fn migrate_legacy_token(storage: &dyn KeyValueStore, key: &str, legacy_key: &str) -> Result<bool, StorageError> {
    let Some(legacy) = storage.get_item(legacy_key) else {
        return Ok(false);
    };
    let legacy = legacy.trim().trim_matches('"').to_owned();

    let mut session = match storage.get_item(key) {
        Some(raw) => Session::from_blob(&raw).unwrap_or_default(),
        None => Session::default(),
    };

    let rewrite = session.token().is_none() && !legacy.is_empty();
    if rewrite {
        session.access_token = Some(legacy);
        let blob = session.to_blob().map_err(|e| StorageError::Write(e.to_string()))?;
        storage.set_item(key, &blob)?;
        log::info!("migrated legacy access token into session blob");
    }

    storage.remove_item(legacy_key);
    Ok(rewrite)
}
