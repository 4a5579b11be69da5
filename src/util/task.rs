//! Component-scoped async tasks.
//!
//! DESIGN
//! ======
//! Futures spawned from a component are wrapped in `Abortable` and their
//! abort handle is registered with the owning reactive scope's cleanup. When
//! the component unmounts (or an effect re-runs) the pending work is dropped
//! at its next suspension point, so results are never applied to disposed
//! state.

#[cfg(test)]
#[path = "task_test.rs"]
mod task_test;

use std::future::Future;

use futures::future::{AbortHandle, Abortable};
use futures::FutureExt;

/// Wrap `fut` so it can be cancelled through the returned handle.
///
/// The wrapped future resolves to `None` when aborted before completion.
pub fn cancellable<F>(fut: F) -> (AbortHandle, impl Future<Output = Option<F::Output>>)
where
    F: Future,
{
    let (handle, registration) = AbortHandle::new_pair();
    let wrapped = Abortable::new(fut, registration).map(Result::ok);
    (handle, wrapped)
}

/// Spawn `fut` on the local executor, aborting it when the current reactive
/// owner is cleaned up.
///
/// Returns the abort handle so callers can also cancel explicitly.
pub fn spawn_scoped<F>(fut: F) -> AbortHandle
where
    F: Future<Output = ()> + 'static,
{
    let (handle, wrapped) = cancellable(fut);
    let on_cleanup_handle = handle.clone();
    leptos::prelude::on_cleanup(move || on_cleanup_handle.abort());

    #[cfg(feature = "csr")]
    leptos::task::spawn_local(async move {
        if wrapped.await.is_none() {
            log::debug!("scoped task cancelled");
        }
    });
    #[cfg(not(feature = "csr"))]
    drop(wrapped);

    handle
}
