//! Signed-in landing page: who is logged in, their avatar, and logout.
//! Redirects to the login route when there is no session.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::components::auth_image::AuthImage;
use crate::context::SharedContext;
use crate::net::types::User;
use crate::state::auth::AuthState;
use crate::util::auth::install_unauth_redirect;
use crate::util::task::spawn_scoped;

/// Up to two uppercase initials from the display name, else from the email.
#[must_use]
pub fn initials(user: &User) -> String {
    let source = if user.name.trim().is_empty() { &user.email } else { &user.name };
    source
        .split(|c: char| c.is_whitespace() || c == '.' || c == '@')
        .filter_map(|part| part.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

#[component]
pub fn HomePage() -> impl IntoView {
    let context = expect_context::<SharedContext>();
    let auth = expect_context::<RwSignal<AuthState>>();
    install_unauth_redirect(auth, use_navigate());

    // Identity may be pending after a token-only restore or an opaque login token.
    let store = context.with_value(|c| c.store.clone());
    spawn_scoped(async move {
        if let Err(e) = store.refresh_profile().await {
            log::warn!("profile refresh failed: {e}");
        }
    });

    let avatar = Signal::derive(move || auth.with(|state| state.user.as_ref().and_then(|u| u.avatar.clone())));
    let placeholder = Signal::derive(move || auth.with(|state| state.user.as_ref().map(initials).unwrap_or_default()));

    let on_logout = move |_| context.with_value(|c| c.store.logout());

    view! {
        <div class="home-page">
            <header class="home-page__header">
                <h1>"CMS Console"</h1>
                <div class="home-page__user">
                    <AuthImage src=avatar alt="Avatar" class="home-page__avatar" placeholder=placeholder/>
                    <div class="home-page__identity">
                        <span class="home-page__name">{move || auth.with(AuthState::display_name)}</span>
                        <span class="home-page__meta">
                            {move || {
                                auth.with(|state| {
                                    state
                                        .user
                                        .as_ref()
                                        .map(|u| format!("{} · {}", u.email, u.role))
                                        .unwrap_or_else(|| "Loading profile...".to_owned())
                                })
                            }}
                        </span>
                    </div>
                    <button class="btn" on:click=on_logout>
                        "Log out"
                    </button>
                </div>
            </header>
        </div>
    }
}
