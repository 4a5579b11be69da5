//! # cms-console
//!
//! Leptos + WASM admin console for the e-commerce CMS backend.
//!
//! This crate contains the session store, the authorized request gateway,
//! authenticated file loading, and the login/home pages built on them.
//! Browser capabilities (storage, fetch, navigation, object URLs) sit behind
//! traits so everything below the pages runs in native tests.

pub mod app;
pub mod components;
pub mod config;
pub mod context;
pub mod logging;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_support;

/// WASM entry point: configure logging and mount [`app::App`].
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    use leptos::prelude::*;

    let config = match config::ClientConfig::from_build_env() {
        Ok(config) => config,
        Err(e) => {
            let fallback = config::ClientConfig::default();
            logging::init(fallback.environment);
            log::error!("invalid build configuration, using defaults: {e}");
            fallback
        }
    };
    logging::init(config.environment);
    log::info!("cms-console starting against {}", config.api_base);

    leptos::mount::mount_to_body(move || view! { <app::App config=config/> });
}
