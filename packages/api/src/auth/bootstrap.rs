//! Auth callback handling.
//!
//! The identity provider sends the user back to a dedicated callback view after the
//! email link / OAuth consent step. The SDK finishes the handshake on its own and
//! then emits a session change; [`SessionBootstrap`] waits for that change and moves
//! the user to the home view, replacing the callback entry in history.
//!
//! Any change counts, including one without a session. A user who is not actually
//! signed in simply lands on the home view in the unauthenticated state.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::session_store::SessionStore;
use crate::notify::Subscription;

/// Client-side navigation used by the callback view.
pub trait Navigator {
    /// Replace the current history entry with `route`.
    fn replace(&self, route: &str);
}

impl<F: Fn(&str)> Navigator for F {
    fn replace(&self, route: &str) {
        self(route)
    }
}

/// One-shot redirect armed while the callback view is mounted.
pub struct SessionBootstrap {
    subscription: Rc<RefCell<Option<Subscription>>>,
    redirected: Rc<Cell<bool>>,
}

impl SessionBootstrap {
    /// Subscribe to `store` and redirect to `home` on the first session change.
    pub fn mount(
        store: &SessionStore,
        home: impl Into<String>,
        navigator: impl Navigator + 'static,
    ) -> Self {
        let home = home.into();
        let subscription: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let redirected = Rc::new(Cell::new(false));

        let slot = subscription.clone();
        let fired = redirected.clone();
        let sub = store.on_session_change(move |event, _session| {
            if fired.replace(true) {
                return;
            }
            tracing::debug!(%event, route = %home, "Auth callback complete, redirecting");
            navigator.replace(&home);
            if let Some(sub) = slot.borrow_mut().take() {
                sub.cancel();
            }
        });
        *subscription.borrow_mut() = Some(sub);

        Self {
            subscription,
            redirected,
        }
    }

    /// Whether the redirect has happened.
    pub fn redirected(&self) -> bool {
        self.redirected.get()
    }

    /// Whether the store subscription is still held.
    pub fn is_listening(&self) -> bool {
        self.subscription.borrow().is_some()
    }

    /// Release the subscription, redirect or not.
    pub fn unmount(self) {}
}

impl Drop for SessionBootstrap {
    fn drop(&mut self) {
        if let Some(sub) = self.subscription.borrow_mut().take() {
            sub.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::{AuthEvent, Identity, Session};

    fn navigations() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) + 'static) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        (log, move |route: &str| sink.borrow_mut().push(route.to_string()))
    }

    #[test]
    fn first_event_redirects_once() {
        let store = SessionStore::new();
        let (log, nav) = navigations();
        let bootstrap = SessionBootstrap::mount(&store, "/", nav);
        assert!(bootstrap.is_listening());

        store.apply(
            AuthEvent::SignedIn,
            Some(Session::new("t", Identity::new("u"))),
        );
        store.apply(AuthEvent::TokenRefreshed, None);
        store.apply(AuthEvent::SignedOut, None);

        assert_eq!(*log.borrow(), vec!["/".to_string()]);
        assert!(bootstrap.redirected());
        assert!(!bootstrap.is_listening());
    }

    #[test]
    fn event_without_session_still_redirects() {
        let store = SessionStore::new();
        let (log, nav) = navigations();
        let _bootstrap = SessionBootstrap::mount(&store, "/home", nav);

        store.apply(AuthEvent::InitialSession, None);

        assert_eq!(*log.borrow(), vec!["/home".to_string()]);
    }

    #[test]
    fn subscription_released_after_redirect() {
        let store = SessionStore::new();
        let (_log, nav) = navigations();
        let _bootstrap = SessionBootstrap::mount(&store, "/", nav);
        assert_eq!(store.subscriber_count(), 1);

        store.apply(AuthEvent::SignedIn, None);

        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn unmount_without_event_releases_subscription() {
        let store = SessionStore::new();
        let (log, nav) = navigations();
        let bootstrap = SessionBootstrap::mount(&store, "/", nav);

        bootstrap.unmount();
        store.apply(AuthEvent::SignedIn, None);

        assert!(log.borrow().is_empty());
    }
}
