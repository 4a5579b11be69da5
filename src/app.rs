//! Root application component with routing and context providers.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::config::ClientConfig;
use crate::context::{AppContext, SharedContext};
use crate::pages::{home::HomePage, login::LoginPage};
use crate::state::auth::AuthState;

/// Root application component.
///
/// Builds the client services once, restores the persisted session, and
/// mirrors every later session change into the `AuthState` signal.
#[component]
pub fn App(config: ClientConfig) -> impl IntoView {
    provide_meta_context();

    let context = Rc::new(AppContext::browser(config));
    let auth = RwSignal::new(AuthState::pending());
    context.store.subscribe(move |session| auth.set(AuthState::from_session(session, false)));
    // Restoring always publishes, so the signal leaves `pending` here.
    context.store.hydrate();

    provide_context::<SharedContext>(StoredValue::new_local(context));
    provide_context(auth);

    view! {
        <Title text="CMS Console"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("") view=HomePage/>
            </Routes>
        </Router>
    }
}
