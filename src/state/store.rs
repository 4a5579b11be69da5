//! Session store: "is the operator logged in, and who are they".
//!
//! ARCHITECTURE
//! ============
//! One store per running UI, built by `AppContext` and shared by reference.
//! State lives in the [`SessionVault`]; the store adds the login/logout
//! workflows, the one-time hydrate step and the loading/error flags the UI
//! renders from.
//!
//! State machine: `Anonymous --login--> Authenticated`,
//! `Authenticated --logout | 401--> Anonymous`,
//! `Authenticated --update_user_from_profile--> Authenticated`.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::session::Session;
use super::token;
use super::vault::{RestoreOutcome, SessionVault};
use crate::net::api;
use crate::net::claims;
use crate::net::gateway::{Gateway, GatewayError};
use crate::net::types::{LoginRequest, LoginResponse, ProfileRecord, User};
use crate::util::navigation::Navigator;
use crate::util::storage::StorageError;

/// Why a login attempt failed. `Display` is the message shown on the login
/// screen.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    /// The server answered with an error; its message is shown verbatim.
    #[error("{0}")]
    Rejected(String),

    #[error("Could not reach the server. Check your connection and try again.")]
    Unreachable,

    #[error("The server did not return an access token.")]
    MissingToken,

    #[error("Unexpected response from the server: {0}")]
    InvalidResponse(String),

    #[error("Could not save the session: {0}")]
    Persist(#[from] StorageError),
}

impl From<GatewayError> for LoginError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Network(_) => Self::Unreachable,
            GatewayError::Status { message: Some(message), .. } => Self::Rejected(message),
            GatewayError::Status { status, message: None } => Self::Rejected(format!("Login failed (status {status}).")),
            GatewayError::Decode(e) | GatewayError::Encode(e) => Self::InvalidResponse(e),
        }
    }
}

pub struct SessionStore {
    vault: Rc<SessionVault>,
    gateway: Rc<Gateway>,
    navigator: Rc<dyn Navigator>,
    legacy_token_key: String,
    login_route: String,
    loading: Cell<bool>,
    hydrated: Cell<bool>,
    last_error: RefCell<Option<String>>,
}

impl SessionStore {
    pub fn new(vault: Rc<SessionVault>, gateway: Rc<Gateway>, navigator: Rc<dyn Navigator>) -> Self {
        let legacy_token_key = gateway.config().legacy_token_key.clone();
        let login_route = gateway.config().login_route.clone();
        Self {
            vault,
            gateway,
            navigator,
            legacy_token_key,
            login_route,
            loading: Cell::new(true),
            hydrated: Cell::new(false),
            last_error: RefCell::new(None),
        }
    }

    /// True until [`SessionStore::hydrate`] has run.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.vault.is_authenticated()
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.vault.current()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.vault.current().user
    }

    /// Message from the most recent failed login, cleared on success.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.last_error.borrow().clone()
    }

    /// Observe every session change, including 401-triggered clears.
    pub fn subscribe(&self, listener: impl Fn(&Session) + 'static) {
        self.vault.subscribe(listener);
    }

    /// Load the persisted session. Runs once; later calls do nothing.
    ///
    /// Never fails: a legacy token is migrated when possible and an
    /// unreadable blob is discarded.
    pub fn hydrate(&self) {
        if self.hydrated.replace(true) {
            return;
        }
        if let Err(e) = token::migrate_legacy_token(self.vault.storage(), self.vault.key(), &self.legacy_token_key) {
            log::warn!("legacy token migration failed: {e}");
        }
        match self.vault.restore() {
            RestoreOutcome::Restored => log::debug!("session restored"),
            RestoreOutcome::Discarded => log::warn!("stored session was unreadable and has been cleared"),
            RestoreOutcome::Empty => log::debug!("no stored session"),
        }
        self.loading.set(false);
    }

    /// Authenticate and replace the whole session.
    ///
    /// On failure the session is untouched, [`SessionStore::last_error`]
    /// holds a displayable message and `false` is returned. `remember` is
    /// forwarded to the server; the session is always persisted.
    pub async fn login(&self, identifier: &str, secret: &str, remember: bool) -> bool {
        match self.try_login(identifier, secret, remember).await {
            Ok(()) => {
                *self.last_error.borrow_mut() = None;
                true
            }
            Err(e) => {
                log::warn!("login failed: {e}");
                *self.last_error.borrow_mut() = Some(e.to_string());
                false
            }
        }
    }

    /// # Errors
    ///
    /// Returns a [`LoginError`] describing why no session was established.
    pub async fn try_login(&self, identifier: &str, secret: &str, remember: bool) -> Result<(), LoginError> {
        let request = LoginRequest {
            email: identifier.trim().to_owned(),
            password: secret.to_owned(),
            remember_me: remember,
        };
        let response = api::login(&self.gateway, &request).await?;
        let session = session_from_login(response)?;
        log::info!(
            "signed in as {} (remember: {remember})",
            session.user.as_ref().map_or("<identity pending>", |u| u.email.as_str())
        );
        self.vault.replace(session)?;
        Ok(())
    }

    /// Clear the session everywhere and leave for the login route.
    pub fn logout(&self) {
        self.vault.clear();
        self.navigator.redirect(&self.login_route);
    }

    /// Replace the session user from a fetched profile. Does nothing when
    /// there is no access token or the profile names no account.
    pub fn update_user_from_profile(&self, profile: &ProfileRecord) {
        if !self.vault.is_authenticated() {
            log::debug!("profile ignored: no active session");
            return;
        }
        let Some(user) = profile.to_user() else {
            log::warn!("profile ignored: no id or email");
            return;
        };
        if let Err(e) = self.vault.replace_user(Some(user)) {
            log::error!("could not persist profile update: {e}");
        }
    }

    /// Fetch `/api/auth/me` and apply it. No request is sent when anonymous.
    ///
    /// # Errors
    ///
    /// Returns the [`GatewayError`] of the profile request.
    pub async fn refresh_profile(&self) -> Result<(), GatewayError> {
        if !self.vault.is_authenticated() {
            return Ok(());
        }
        let profile = api::fetch_profile(&self.gateway).await?;
        self.update_user_from_profile(&profile);
        Ok(())
    }
}

/// Build a session from the login response, taking identity from the
/// embedded user record or, failing that, from the token's claims.
///
/// # Errors
///
/// Returns [`LoginError::MissingToken`] when no access token was issued.
pub fn session_from_login(response: LoginResponse) -> Result<Session, LoginError> {
    let access_token = response
        .access_token
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())
        .ok_or(LoginError::MissingToken)?;

    let user = response
        .user
        .as_ref()
        .and_then(ProfileRecord::to_user)
        .or_else(|| claims::user_from_token(&access_token));

    Ok(Session {
        user,
        access_token: Some(access_token),
        refresh_token: response.refresh_token.filter(|t| !t.is_empty()),
    })
}
