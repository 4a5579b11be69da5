//! Hard navigation (full page load) used by session invalidation paths.
//!
//! Soft route changes go through `leptos_router::hooks::use_navigate`; this
//! seam exists for the gateway and the session store, which run outside any
//! component and must leave the current page entirely.

/// Performs a full-page navigation to an absolute in-app path.
pub trait Navigator {
    fn redirect(&self, path: &str);
}

/// Navigator backed by `window.location.href`. No-op outside the browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn redirect(&self, path: &str) {
        #[cfg(feature = "csr")]
        {
            let Some(window) = web_sys::window() else {
                log::error!("redirect to {path} skipped: no window");
                return;
            };
            if let Err(e) = window.location().set_href(path) {
                log::error!("redirect to {path} failed: {e:?}");
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            log::debug!("redirect to {path} ignored outside the browser");
        }
    }
}
