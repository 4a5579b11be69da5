//! Authorized request gateway.
//!
//! ARCHITECTURE
//! ============
//! Every API call goes through [`Gateway::execute`]. Outbound, the current
//! access token is read from persisted storage and attached as a bearer
//! header; a missing token just sends the request bare. Inbound, a 401
//! clears the session vault and hard-redirects to the login route, then the
//! error is still returned so the caller's own failure path runs.
//!
//! ERROR HANDLING
//! ==============
//! No retries, no queueing, no de-duplication. Each call is independent and
//! a human operator retries by hand.

#[cfg(test)]
#[path = "gateway_test.rs"]
mod gateway_test;

use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::transport::{HttpRequest, HttpResponse, HttpTransport, Method};
use super::types::{Envelope, error_message};
use crate::config::ClientConfig;
use crate::state::vault::SessionVault;
use crate::util::navigation::Navigator;

pub const UNAUTHORIZED: u16 = 401;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// No response was received.
    #[error("could not reach server: {0}")]
    Network(String),

    /// The server answered with a non-2xx status. A 401 has already expired
    /// the session by the time the caller sees this.
    #[error("request failed with status {status}")]
    Status { status: u16, message: Option<String> },

    /// The response body did not match the expected type.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The request body could not be serialized.
    #[error("request encode failed: {0}")]
    Encode(String),
}

impl GatewayError {
    /// HTTP status if the server responded.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Description of one API call relative to the configured base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<String>,
    /// Whether a 401 should expire the session. Credential checks opt out:
    /// their 401 means "wrong password", not "session expired".
    pub expire_session_on_401: bool,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), body: None, expire_session_on_401: true }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }


    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Encode`] if `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, GatewayError> {
        self.body = Some(serde_json::to_string(body).map_err(|e| GatewayError::Encode(e.to_string()))?);
        Ok(self)
    }

    #[must_use]
    pub fn without_session_expiry(mut self) -> Self {
        self.expire_session_on_401 = false;
        self
    }
}

pub struct Gateway {
    config: Rc<ClientConfig>,
    transport: Rc<dyn HttpTransport>,
    vault: Rc<SessionVault>,
    navigator: Rc<dyn Navigator>,
}

impl Gateway {
    pub fn new(
        config: Rc<ClientConfig>,
        transport: Rc<dyn HttpTransport>,
        vault: Rc<SessionVault>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        Self { config, transport, vault, navigator }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether a bearer credential would be attached right now.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.vault.access_token().is_some()
    }

    /// Send `request`, returning the buffered response on 2xx.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Network`] when no response arrives,
    /// [`GatewayError::Status`] for any non-2xx status.
    pub async fn execute(&self, request: ApiRequest) -> Result<HttpResponse, GatewayError> {
        let outbound = self.authorize(&request);
        log::debug!("{} {}", outbound.method.as_str(), outbound.url);

        let response = self.transport.send(outbound).await.map_err(|e| {
            log::warn!("{} {} unreachable: {e}", request.method.as_str(), request.path);
            GatewayError::Network(e.0)
        })?;

        if response.status == UNAUTHORIZED && request.expire_session_on_401 {
            self.expire_session(&request.path);
        }

        if !response.is_success() {
            return Err(GatewayError::Status { status: response.status, message: error_message(&response.body) });
        }
        Ok(response)
    }

    /// Send `request` and decode a JSON body, unwrapping a `{data: ...}`
    /// envelope when present.
    ///
    /// # Errors
    ///
    /// Any [`Gateway::execute`] error, or [`GatewayError::Decode`].
    pub async fn execute_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, GatewayError> {
        let response = self.execute(request).await?;
        serde_json::from_slice::<Envelope<T>>(&response.body)
            .map(Envelope::into_inner)
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    /// # Errors
    ///
    /// See [`Gateway::execute_json`].
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        self.execute_json(ApiRequest::get(path)).await
    }

    fn authorize(&self, request: &ApiRequest) -> HttpRequest {
        let mut outbound = HttpRequest::new(request.method, self.config.url(&request.path));
        outbound.headers.push(("Accept".to_owned(), "application/json".to_owned()));
        if let Some(token) = self.vault.access_token() {
            outbound.headers.push(("Authorization".to_owned(), bearer(&token)));
        }
        if let Some(body) = &request.body {
            outbound.headers.push(("Content-Type".to_owned(), "application/json".to_owned()));
            outbound.body = Some(body.clone());
        }
        outbound
    }

    fn expire_session(&self, path: &str) {
        log::warn!("401 from {path}: session expired, redirecting to {}", self.config.login_route);
        self.vault.clear();
        self.navigator.redirect(&self.config.login_route);
    }
}

#[must_use]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}
