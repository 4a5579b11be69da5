//! REST DTOs for the authentication and profile endpoints.
//!
//! DESIGN
//! ======
//! The backend is not consistent about envelopes or identifier types, so the
//! inbound types accept both shapes (`{data: ...}` or bare, string or numeric
//! ids) and normalize them into the small [`User`] record the session keeps.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Role marker assigned when a profile carries no role.
pub const DEFAULT_ROLE: &str = "USER";

/// Identity of the signed-in operator as kept in the session blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend identifier, stringified.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub email: String,
    /// Display name.
    pub name: String,
    /// Primary role (`"ADMIN"`, `"USER"`, ...).
    pub role: String,
    /// Avatar file name or path served by `/api/file/{name}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A role entry as returned by the profile endpoint: either `"ADMIN"` or
/// `{"name": "ADMIN", ...}`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RoleRef {
    Name(String),
    Named { name: String },
}

impl RoleRef {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Named { name } => name,
        }
    }
}

/// Profile payload from `GET /api/auth/me` (also embedded in login responses).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<RoleRef>,
    #[serde(default)]
    pub roles: Vec<RoleRef>,
    #[serde(default, alias = "avatarUrl")]
    pub avatar: Option<String>,
}

impl ProfileRecord {
    /// Primary role: the first listed role, then the scalar `role`, then
    /// [`DEFAULT_ROLE`].
    #[must_use]
    pub fn primary_role(&self) -> String {
        self.roles
            .first()
            .or(self.role.as_ref())
            .map(RoleRef::name)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_ROLE)
            .to_owned()
    }

    /// Derive the session [`User`]. Returns `None` when the record carries
    /// neither an id nor an email to identify the account.
    #[must_use]
    pub fn to_user(&self) -> Option<User> {
        let email = non_blank(self.email.as_deref());
        let id = non_blank(self.id.as_deref()).or(email)?;
        let name = non_blank(self.full_name.as_deref())
            .or(non_blank(self.name.as_deref()))
            .or(non_blank(self.username.as_deref()))
            .or(email)
            .unwrap_or(id);

        Some(User {
            id: id.to_owned(),
            email: email.unwrap_or_default().to_owned(),
            name: name.to_owned(),
            role: self.primary_role(),
            avatar: non_blank(self.avatar.as_deref()).map(str::to_owned),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Credentials posted to `POST /api/auth/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

/// Token material returned by the login endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default, alias = "token", alias = "access_token")]
    pub access_token: Option<String>,
    #[serde(default, alias = "refresh_token")]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<ProfileRecord>,
}

/// Response envelope: `{"data": T, ...}` or `T` itself.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// Extract a human-readable message from an error body, preferring
/// `message` over `error`.
#[must_use]
pub fn error_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).unwrap_or(serde_json::Value::Null);
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(serde_json::Value::as_str))
        .map(str::trim)
        .filter(|msg| !msg.is_empty())
        .map(str::to_owned)
}

fn id_from_value<E: serde::de::Error>(value: serde_json::Value) -> Result<Option<String>, E> {
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        _ => Err(E::custom("expected string or number id")),
    }
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    id_from_value(value)?.ok_or_else(|| D::Error::custom("expected id"))
}

fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    id_from_value(value)
}
