//! Reactive view of the session for route guards and user-aware components.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` keeps one `RwSignal<AuthState>` in context and rewrites it from the
//! session vault's change notifications, so a 401 anywhere in the app reaches
//! every guard without the components knowing about the vault.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use super::session::Session;
use crate::net::types::User;

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    /// An access token is present. May be true while `user` is still `None`.
    pub authenticated: bool,
    /// The persisted session has not been read yet.
    pub loading: bool,
}

impl AuthState {
    #[must_use]
    pub fn from_session(session: &Session, loading: bool) -> Self {
        Self { user: session.user.clone(), authenticated: session.is_authenticated(), loading }
    }

    /// Initial state before hydrate.
    #[must_use]
    pub fn pending() -> Self {
        Self { user: None, authenticated: false, loading: true }
    }

    /// Label for the header: display name, then email, then a placeholder.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.user {
            Some(user) if !user.name.is_empty() => user.name.clone(),
            Some(user) if !user.email.is_empty() => user.email.clone(),
            _ => "Signed in".to_owned(),
        }
    }
}
