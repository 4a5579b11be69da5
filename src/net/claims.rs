//! Identity claims carried in a JWT access token.
//!
//! The payload segment is decoded without verifying the signature: the
//! client only reads its own identity for display. Authorization is always
//! decided by the server.

#[cfg(test)]
#[path = "claims_test.rs"]
mod claims_test;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

use super::types::{ProfileRecord, RoleRef, User};

#[derive(Debug, Default, Deserialize)]
struct IdentityClaims {
    #[serde(default)]
    sub: Option<serde_json::Value>,
    #[serde(default, alias = "userId", alias = "user_id")]
    id: Option<serde_json::Value>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "preferred_username")]
    username: Option<String>,
    #[serde(default)]
    role: Option<RoleRef>,
    #[serde(default, alias = "authorities")]
    roles: Vec<RoleRef>,
    #[serde(default, alias = "picture")]
    avatar: Option<String>,
}

fn scalar(value: Option<serde_json::Value>) -> Option<String> {
    match value? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode the payload segment of a compact JWT into a JSON object.
pub fn decode_payload(token: &str) -> Option<serde_json::Value> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let bytes = match URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::debug!("token payload is not base64url: {e}");
            return None;
        }
    };
    match serde_json::from_slice::<serde_json::Value>(&bytes) {
        Ok(value) if value.is_object() => Some(value),
        Ok(_) => None,
        Err(e) => {
            log::debug!("token payload is not JSON: {e}");
            None
        }
    }
}

/// Build the session [`User`] from the token's identity claims.
///
/// Returns `None` when the token is not a JWT or names no account. A
/// `sub` that looks like an email doubles as the email claim.
pub fn user_from_token(token: &str) -> Option<User> {
    let payload = decode_payload(token)?;
    let claims: IdentityClaims = match serde_json::from_value(payload) {
        Ok(claims) => claims,
        Err(e) => {
            log::debug!("token claims unreadable: {e}");
            return None;
        }
    };

    let sub = scalar(claims.sub);
    let email = claims.email.or_else(|| sub.clone().filter(|s| s.contains('@')));
    let profile = ProfileRecord {
        id: scalar(claims.id).or(sub),
        email,
        name: claims.name,
        full_name: None,
        username: claims.username,
        role: claims.role,
        roles: claims.roles,
        avatar: claims.avatar,
    };
    profile.to_user()
}
