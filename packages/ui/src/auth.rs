//! Session and profile context for the UI.
//!
//! The app root wraps everything in [`SessionProvider`] (one [`SessionStore`] per
//! application instance) and [`ProfileProvider`] (profile state derived from it).
//! Views read the state with [`use_profile`]; the auth callback view arms the
//! one-shot redirect with [`use_auth_callback`].

use std::rc::Rc;

use api::{
    AuthConfig, ProfileContext, ProfileState, Provisioner, RemoteProfileStore, SessionBootstrap,
    SessionStore,
};
use dioxus::prelude::*;

/// Get the session store for this application instance.
pub fn use_session_store() -> SessionStore {
    use_context::<SessionStore>()
}

/// Get the current profile state.
/// Returns a signal that updates on every profile state transition.
pub fn use_profile() -> Signal<ProfileState> {
    use_context::<Signal<ProfileState>>()
}

/// Publishes `store` to the component tree and closes it when the tree goes away.
#[component]
pub fn SessionProvider(store: SessionStore, children: Element) -> Element {
    let provided = use_context_provider(|| store.clone());
    use_drop(move || provided.close());

    rsx! {
        {children}
    }
}

/// Provider component that keeps the profile state in sync with the session.
/// Must be rendered inside a [`SessionProvider`].
#[component]
pub fn ProfileProvider(children: Element) -> Element {
    let sessions = use_session_store();
    let mut profile_state = use_signal(ProfileState::default);

    let context = use_hook(|| {
        let config = try_consume_context::<AuthConfig>().unwrap_or_default();
        let provisioner =
            Provisioner::new(RemoteProfileStore::new()).with_timeout(config.store_timeout());
        Rc::new(ProfileContext::new(provisioner))
    });

    // Mirror every transition into the signal, then start following the session.
    let _subscription = use_hook(|| {
        Rc::new(context.subscribe(move |state| {
            tracing::debug!(?state, "Profile state changed");
            profile_state.set(state.clone());
        }))
    });
    use_hook(|| {
        let feed = context.clone().attach(&sessions);
        spawn(feed.run());
    });

    use_context_provider(|| profile_state);

    rsx! {
        {children}
    }
}

/// Redirect away from the auth callback view once the identity provider reports
/// any session change. `navigate` receives the configured home route and must
/// replace the current history entry.
pub fn use_auth_callback(navigate: impl Fn(&str) + 'static) {
    let sessions = use_session_store();
    use_hook(move || {
        let config = try_consume_context::<AuthConfig>().unwrap_or_default();
        Rc::new(SessionBootstrap::mount(&sessions, config.routes.home, navigate))
    });
}
