//! `<img>` for files behind the bearer credential.
//!
//! The component owns one [`AuthenticatedResource`]. Each change of `src`
//! reloads it; the previous object URL is revoked first and unmounting
//! releases the last one. Until a URL is available the fallback is shown.

use std::rc::Rc;

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::net::resource::AuthenticatedResource;
use crate::util::task::spawn_scoped;

#[component]
pub fn AuthImage(
    /// File name or `/api/file/...` path; `None` shows the fallback.
    #[prop(into)]
    src: Signal<Option<String>>,
    #[prop(into, optional)] alt: String,
    #[prop(into, optional)] class: String,
    /// Text shown in place of the image (e.g. initials).
    #[prop(into, optional)]
    placeholder: Signal<String>,
) -> impl IntoView {
    let resource: Rc<AuthenticatedResource> = Rc::new(use_app_context().avatar_resource());
    let slot = StoredValue::new_local(resource);
    let object_url = RwSignal::new(None::<String>);

    Effect::new(move || {
        let path = src.get();
        let resource = slot.get_value();
        object_url.set(None);
        spawn_scoped(async move {
            let url = resource.load(path.as_deref()).await;
            object_url.set(url);
        });
    });

    on_cleanup(move || slot.with_value(|resource| resource.release()));

    view! {
        <Show
            when=move || object_url.get().is_some()
            fallback=move || view! { <span class="auth-image auth-image--fallback">{move || placeholder.get()}</span> }
        >
            <img class=format!("auth-image {class}") alt=alt.clone() src=move || object_url.get().unwrap_or_default()/>
        </Show>
    }
}
