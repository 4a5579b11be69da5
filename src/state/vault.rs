//! Process-wide session record, kept in memory and in storage together.
//!
//! DESIGN
//! ======
//! Every mutation writes the whole blob to storage first and only then
//! replaces the in-memory copy, so a failed write never leaves the two out
//! of sync. Mutations replace the full record; there are no field-level
//! writers. Listeners are notified after each change, including clears
//! triggered by the request gateway on a 401.

#[cfg(test)]
#[path = "vault_test.rs"]
mod vault_test;

use std::cell::RefCell;
use std::rc::Rc;

use super::session::Session;
use super::token;
use crate::net::types::User;
use crate::util::storage::{KeyValueStore, StorageError};

/// Result of reading the persisted blob at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// No blob was stored.
    Empty,
    /// The blob was parsed and adopted.
    Restored,
    /// The blob was unreadable and has been removed.
    Discarded,
}

type Listener = Rc<dyn Fn(&Session)>;

pub struct SessionVault {
    storage: Rc<dyn KeyValueStore>,
    key: String,
    current: RefCell<Session>,
    listeners: RefCell<Vec<Listener>>,
}

impl SessionVault {
    /// Create an empty vault over `storage`. Call [`SessionVault::restore`]
    /// to adopt a previously persisted session.
    pub fn new(storage: Rc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            current: RefCell::new(Session::default()),
            listeners: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn storage(&self) -> &dyn KeyValueStore {
        self.storage.as_ref()
    }

    /// Snapshot of the in-memory session.
    #[must_use]
    pub fn current(&self) -> Session {
        self.current.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_authenticated()
    }

    /// Token as persisted in storage; this is what the gateway sends.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        token::access_token(self.storage.as_ref(), &self.key)
    }

    /// Adopt the persisted blob as the in-memory session.
    ///
    /// An unreadable blob is removed and the session stays empty.
    pub fn restore(&self) -> RestoreOutcome {
        let Some(raw) = self.storage.get_item(&self.key) else {
            self.set_current(Session::default());
            return RestoreOutcome::Empty;
        };
        match Session::from_blob(&raw) {
            Ok(session) => {
                self.set_current(session);
                RestoreOutcome::Restored
            }
            Err(e) => {
                log::warn!("discarding unreadable session blob: {e}");
                self.storage.remove_item(&self.key);
                self.set_current(Session::default());
                RestoreOutcome::Discarded
            }
        }
    }

    /// Replace the whole session and persist it.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the blob cannot be written; the previous
    /// session is left in place both in memory and in storage.
    pub fn replace(&self, session: Session) -> Result<(), StorageError> {
        let blob = session.to_blob().map_err(|e| StorageError::Write(e.to_string()))?;
        self.storage.set_item(&self.key, &blob)?;
        self.set_current(session);
        Ok(())
    }

    /// Replace only the user of the current session, re-persisting the
    /// whole record.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the blob cannot be written.
    pub fn replace_user(&self, user: Option<User>) -> Result<(), StorageError> {
        let mut next = self.current();
        next.user = user;
        self.replace(next)
    }

    /// Drop the session from memory and storage. Clearing an empty vault
    /// still notifies listeners.
    pub fn clear(&self) {
        self.storage.remove_item(&self.key);
        self.set_current(Session::default());
    }

    /// Register a listener called after every replace/clear/restore.
    pub fn subscribe(&self, listener: impl Fn(&Session) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    fn set_current(&self, session: Session) {
        *self.current.borrow_mut() = session;
        let snapshot = self.current();
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener(&snapshot);
        }
    }
}
