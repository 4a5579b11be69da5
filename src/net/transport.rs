//! Raw HTTP exchange behind the request gateway.
//!
//! Client-side (csr): real requests via `gloo-net`.
//! Elsewhere: every send fails with a [`TransportError`], matching the
//! "no response" branch so callers degrade instead of panicking.

#![allow(clippy::unused_async)]

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// A fully resolved outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), headers: Vec::new(), body: None }
    }

    /// First header value matching `name`, case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response as received from the server, body fully buffered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// No response was received (DNS, CORS, offline, aborted).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transport failed: {0}")]
pub struct TransportError(pub String);

/// Sends requests. Enables mocking the network in tests.
#[async_trait::async_trait(?Send)]
pub trait HttpTransport {
    /// Send `request` and buffer the full response.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when no response was received. Non-2xx
    /// statuses are successful exchanges, not errors.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Browser `fetch` transport.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTransport;

#[async_trait::async_trait(?Send)]
impl HttpTransport for BrowserTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        #[cfg(feature = "csr")]
        {
            use gloo_net::http::RequestBuilder;

            let url = request.url.as_str();
            let mut builder: RequestBuilder = match request.method {
                Method::Get => gloo_net::http::Request::get(url),
                Method::Post => gloo_net::http::Request::post(url),
                Method::Put => gloo_net::http::Request::put(url),
                Method::Delete => gloo_net::http::Request::delete(url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }
            let prepared = match request.body {
                Some(body) => builder.body(body),
                None => builder.build(),
            }
            .map_err(|e| TransportError(e.to_string()))?;

            let resp = prepared.send().await.map_err(|e| TransportError(e.to_string()))?;
            let status = resp.status();
            let content_type = resp.headers().get("content-type");
            let body = resp.binary().await.map_err(|e| TransportError(e.to_string()))?;
            Ok(HttpResponse { status, content_type, body })
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(TransportError(format!("{} {} not available outside the browser", request.method.as_str(), request.url)))
        }
    }
}
