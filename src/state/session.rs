//! The persisted session record.
//!
//! Stored as a single JSON blob `{user, token, refreshToken}`. There is no
//! schema version; an unreadable blob is discarded on hydrate.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::{Deserialize, Serialize};

use crate::net::types::User;

/// Authentication material and identity of the current operator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub user: Option<User>,
    /// Bearer credential sent with every API request.
    #[serde(default, rename = "token")]
    pub access_token: Option<String>,
    /// Stored for the backend's refresh flow; never exchanged by this client.
    #[serde(default, rename = "refreshToken")]
    pub refresh_token: Option<String>,
}

impl Session {
    /// The bearer credential, if one is present. An empty string is no
    /// credential.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.is_empty())
    }

    /// Authentication is gated on the access token alone. A token without a
    /// user is an authenticated session whose identity has not been loaded yet.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Serialize to the persisted blob format.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; unreachable for well-formed strings.
    pub fn to_blob(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a persisted blob.
    ///
    /// # Errors
    ///
    /// Returns the parse error for malformed JSON or a wrong shape.
    pub fn from_blob(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
