//! Authenticated binary resources (avatars) as local object URLs.
//!
//! SYSTEM CONTEXT
//! ==============
//! `<img src>` cannot carry an `Authorization` header, so protected files are
//! fetched through the gateway and exposed to the DOM as `blob:` URLs.
//!
//! DESIGN
//! ======
//! An [`AuthenticatedResource`] owns at most one live [`ObjectUrl`]. Every
//! `load` first revokes the previous URL and aborts any fetch still in
//! flight; a superseded load resolves to `None` without minting a URL.
//! Missing path, missing token and fetch failure all collapse to `None` so
//! the caller shows its fallback.

#[cfg(test)]
#[path = "resource_test.rs"]
mod resource_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::future::AbortHandle;

use super::api;
use super::gateway::Gateway;
use crate::util::task::cancellable;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("object URL creation failed: {0}")]
pub struct ObjectUrlError(pub String);

/// Mints and revokes `blob:` URLs.
pub trait ObjectUrls {
    /// Materialize `bytes` as a locally addressable URL.
    ///
    /// # Errors
    ///
    /// Returns an [`ObjectUrlError`] if the platform refuses.
    fn create(&self, bytes: &[u8], content_type: Option<&str>) -> Result<String, ObjectUrlError>;

    fn revoke(&self, url: &str);
}

/// `Blob` + `URL.createObjectURL` in the browser; unavailable elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserObjectUrls;

impl ObjectUrls for BrowserObjectUrls {
    #[cfg_attr(not(feature = "csr"), expect(unused_variables))]
    fn create(&self, bytes: &[u8], content_type: Option<&str>) -> Result<String, ObjectUrlError> {
        #[cfg(feature = "csr")]
        {
            let array = js_sys::Uint8Array::from(bytes);
            let parts = js_sys::Array::of1(&array);
            let options = web_sys::BlobPropertyBag::new();
            if let Some(content_type) = content_type {
                options.set_type(content_type);
            }
            let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
                .map_err(|e| ObjectUrlError(format!("{e:?}")))?;
            web_sys::Url::create_object_url_with_blob(&blob).map_err(|e| ObjectUrlError(format!("{e:?}")))
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(ObjectUrlError("not available outside the browser".to_owned()))
        }
    }

    fn revoke(&self, url: &str) {
        #[cfg(feature = "csr")]
        {
            if let Err(e) = web_sys::Url::revoke_object_url(url) {
                log::warn!("revoking {url} failed: {e:?}");
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            log::debug!("revoke {url} ignored outside the browser");
        }
    }
}

/// An object URL that is revoked when dropped.
pub struct ObjectUrl {
    url: String,
    urls: Rc<dyn ObjectUrls>,
}

impl ObjectUrl {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        self.urls.revoke(&self.url);
    }
}

impl std::fmt::Debug for ObjectUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ObjectUrl").field(&self.url).finish()
    }
}

pub struct AuthenticatedResource {
    gateway: Rc<Gateway>,
    urls: Rc<dyn ObjectUrls>,
    current: RefCell<Option<ObjectUrl>>,
    in_flight: RefCell<Option<AbortHandle>>,
    generation: Cell<u64>,
}

impl AuthenticatedResource {
    pub fn new(gateway: Rc<Gateway>, urls: Rc<dyn ObjectUrls>) -> Self {
        Self {
            gateway,
            urls,
            current: RefCell::new(None),
            in_flight: RefCell::new(None),
            generation: Cell::new(0),
        }
    }

    /// The URL currently held, if any.
    #[must_use]
    pub fn current_url(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|u| u.as_str().to_owned())
    }

    /// Resolve `path` to a displayable object URL.
    ///
    /// Releases the previous URL before anything else. Returns `None` for a
    /// missing path or token (no request is sent), a failed fetch, or a load
    /// superseded by a later `load`/`release`.
    pub async fn load(&self, path: Option<&str>) -> Option<String> {
        self.release();
        let generation = self.generation.get();

        let path = path.map(str::trim).filter(|p| !p.is_empty())?;
        if !self.gateway.has_credentials() {
            log::debug!("skipping {path}: no access token");
            return None;
        }

        let (handle, fetch) = cancellable(api::fetch_file(&self.gateway, path));
        *self.in_flight.borrow_mut() = Some(handle);
        let outcome = fetch.await;

        if self.generation.get() != generation {
            return None;
        }
        self.in_flight.borrow_mut().take();

        let response = match outcome {
            None => return None,
            Some(Err(e)) => {
                log::debug!("fetching {path} failed: {e}");
                return None;
            }
            Some(Ok(response)) => response,
        };

        match self.urls.create(&response.body, response.content_type.as_deref()) {
            Ok(url) => {
                *self.current.borrow_mut() = Some(ObjectUrl { url: url.clone(), urls: self.urls.clone() });
                Some(url)
            }
            Err(e) => {
                log::warn!("{e}");
                None
            }
        }
    }

    /// Revoke the held URL and abort any in-flight fetch.
    pub fn release(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        if let Some(handle) = self.in_flight.borrow_mut().take() {
            handle.abort();
        }
        let previous = self.current.borrow_mut().take();
        drop(previous);
    }
}

impl Drop for AuthenticatedResource {
    fn drop(&mut self) {
        self.release();
    }
}
