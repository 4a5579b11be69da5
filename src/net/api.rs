//! REST endpoints used by the session slice.
//!
//! All calls go through the [`Gateway`], so they carry the bearer credential
//! and share its 401 handling. The login call opts out of session expiry:
//! a 401 there is a credential rejection.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use super::gateway::{ApiRequest, Gateway, GatewayError};
use super::transport::HttpResponse;
use super::types::{LoginRequest, LoginResponse, ProfileRecord};

pub const LOGIN_ENDPOINT: &str = "/api/auth/login";
pub const PROFILE_ENDPOINT: &str = "/api/auth/me";
const FILE_ENDPOINT_PREFIX: &str = "/api/file/";

/// Normalize an avatar reference to its `/api/file/{name}` path.
///
/// Accepts a bare file name or a path already under `/api/file/`. Returns
/// `None` for blank input.
#[must_use]
pub fn file_endpoint(reference: &str) -> Option<String> {
    let reference = reference.trim();
    let name = reference
        .strip_prefix(FILE_ENDPOINT_PREFIX)
        .or_else(|| reference.strip_prefix(&FILE_ENDPOINT_PREFIX[1..]))
        .unwrap_or(reference)
        .trim_start_matches('/');
    if name.is_empty() {
        return None;
    }
    Some(format!("{FILE_ENDPOINT_PREFIX}{}", urlencoding::encode(name)))
}

/// `POST /api/auth/login`.
///
/// # Errors
///
/// Returns a [`GatewayError`] for transport failures, non-2xx statuses or an
/// unreadable body.
pub async fn login(gateway: &Gateway, request: &LoginRequest) -> Result<LoginResponse, GatewayError> {
    let call = ApiRequest::post(LOGIN_ENDPOINT).json(request)?.without_session_expiry();
    gateway.execute_json(call).await
}

/// `GET /api/auth/me`.
///
/// # Errors
///
/// Returns a [`GatewayError`] on failure; a 401 has already expired the session.
pub async fn fetch_profile(gateway: &Gateway) -> Result<ProfileRecord, GatewayError> {
    gateway.get_json(PROFILE_ENDPOINT).await
}

/// `GET /api/file/{name}`, returning the raw bytes and content type.
///
/// # Errors
///
/// Returns [`GatewayError::Encode`] for a blank reference, otherwise any
/// gateway failure.
pub async fn fetch_file(gateway: &Gateway, reference: &str) -> Result<HttpResponse, GatewayError> {
    let path = file_endpoint(reference).ok_or_else(|| GatewayError::Encode("empty file reference".to_owned()))?;
    gateway.execute(ApiRequest::get(path)).await
}
