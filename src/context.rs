//! Wiring of the shared client services.
//!
//! DESIGN
//! ======
//! One [`AppContext`] is built at startup and handed to components through
//! Leptos context. Every browser capability enters through a trait object,
//! so tests build the same graph over in-memory doubles.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use std::rc::Rc;

use crate::config::ClientConfig;
use crate::net::gateway::Gateway;
use crate::net::resource::{AuthenticatedResource, BrowserObjectUrls, ObjectUrls};
use crate::net::transport::{BrowserTransport, HttpTransport};
use crate::state::store::SessionStore;
use crate::state::vault::SessionVault;
use crate::util::navigation::{BrowserNavigator, Navigator};
use crate::util::storage::{BrowserStorage, KeyValueStore, MemoryStorage};

pub struct AppContext {
    pub config: Rc<ClientConfig>,
    pub vault: Rc<SessionVault>,
    pub gateway: Rc<Gateway>,
    pub store: Rc<SessionStore>,
    pub object_urls: Rc<dyn ObjectUrls>,
}

impl AppContext {
    pub fn new(
        config: ClientConfig,
        storage: Rc<dyn KeyValueStore>,
        transport: Rc<dyn HttpTransport>,
        navigator: Rc<dyn Navigator>,
        object_urls: Rc<dyn ObjectUrls>,
    ) -> Self {
        let config = Rc::new(config);
        let vault = Rc::new(SessionVault::new(storage, config.session_key.clone()));
        let gateway = Rc::new(Gateway::new(config.clone(), transport, vault.clone(), navigator.clone()));
        let store = Rc::new(SessionStore::new(vault.clone(), gateway.clone(), navigator));
        Self { config, vault, gateway, store, object_urls }
    }

    /// Context over the real browser capabilities. Falls back to in-memory
    /// storage when `localStorage` is blocked; the session then lasts for
    /// the page lifetime only.
    pub fn browser(config: ClientConfig) -> Self {
        let storage: Rc<dyn KeyValueStore> = if BrowserStorage::is_available() {
            Rc::new(BrowserStorage)
        } else {
            log::warn!("localStorage unavailable; session will not survive a reload");
            Rc::new(MemoryStorage::new())
        };
        Self::new(config, storage, Rc::new(BrowserTransport), Rc::new(BrowserNavigator), Rc::new(BrowserObjectUrls))
    }

    /// A fresh resource slot, e.g. one per rendered avatar.
    #[must_use]
    pub fn avatar_resource(&self) -> AuthenticatedResource {
        AuthenticatedResource::new(self.gateway.clone(), self.object_urls.clone())
    }
}

/// How the context travels through Leptos: the services are `!Send`, so they
/// sit in local arena storage behind a `Copy` handle.
pub type SharedContext = leptos::prelude::StoredValue<Rc<AppContext>, leptos::prelude::LocalStorage>;

/// The context provided by `App`.
///
/// # Panics
///
/// Panics when called outside the `App` component tree.
#[must_use]
pub fn use_app_context() -> Rc<AppContext> {
    use leptos::prelude::{GetValue, expect_context};
    expect_context::<SharedContext>().get_value()
}
