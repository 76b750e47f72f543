//! # SessionStore — single source of truth for the current session
//!
//! One [`SessionStore`] exists per application instance. It is created explicitly
//! at startup, handed to the UI through context, and torn down with
//! [`close`](SessionStore::close). Clones share the same state.
//!
//! The store only mirrors what the identity provider reports:
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`current_session`](SessionStore::current_session) | Last known session; no I/O. |
//! | [`on_session_change`](SessionStore::on_session_change) | Ordered change notifications (see [`crate::notify`]). |
//! | [`on_diagnostic`](SessionStore::on_diagnostic) | Provider connection failures. |
//! | [`apply`](SessionStore::apply) | Record a provider event and notify subscribers. |
//! | [`report`](SessionStore::report) | Record a provider failure; the session is left untouched. |
//! | [`connect`](SessionStore::connect) | Pump an [`IdentityProvider`] into the store until it ends. |
//!
//! A provider failure never reaches change subscribers: the store keeps serving the
//! last known session and publishes the error to the diagnostic hook only.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::provider::IdentityProvider;
use super::session::{AuthEvent, Session};
use crate::error::ProviderError;
use crate::notify::{Listeners, Subscription};

/// A session change as delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionChange {
    pub event: AuthEvent,
    pub session: Option<Session>,
}

struct Inner {
    current: RefCell<Option<Session>>,
    changes: Listeners<SessionChange>,
    diagnostics: Listeners<ProviderError>,
    closed: Cell<bool>,
}

/// Owned, injectable session state for one application instance.
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<Inner>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for SessionStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("current", &self.inner.current.borrow())
            .field("subscribers", &self.inner.changes.len())
            .field("closed", &self.inner.closed.get())
            .finish()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                current: RefCell::new(None),
                changes: Listeners::new(),
                diagnostics: Listeners::new(),
                closed: Cell::new(false),
            }),
        }
    }

    /// Snapshot of the last known session.
    pub fn current_session(&self) -> Option<Session> {
        self.inner.current.borrow().clone()
    }

    /// Register a handler for every session change, in provider order.
    pub fn on_session_change(
        &self,
        mut handler: impl FnMut(AuthEvent, Option<&Session>) + 'static,
    ) -> Subscription {
        self.inner
            .changes
            .subscribe(move |change: &SessionChange| handler(change.event, change.session.as_ref()))
    }

    /// Register a handler for provider connection failures.
    pub fn on_diagnostic(&self, handler: impl FnMut(&ProviderError) + 'static) -> Subscription {
        self.inner.diagnostics.subscribe(handler)
    }

    /// Record a provider event and notify subscribers.
    pub fn apply(&self, event: AuthEvent, session: Option<Session>) {
        if self.inner.closed.get() {
            tracing::debug!(%event, "Session store closed, ignoring event");
            return;
        }
        tracing::debug!(
            %event,
            user_id = ?session.as_ref().map(|s| s.user_id().as_str()),
            "Session change"
        );
        *self.inner.current.borrow_mut() = session.clone();
        self.inner.changes.dispatch(SessionChange { event, session });
    }

    /// Record a provider failure. The last known session stays in place.
    pub fn report(&self, error: ProviderError) {
        if self.inner.closed.get() {
            return;
        }
        tracing::warn!(%error, "Identity provider error, keeping last known session");
        self.inner.diagnostics.dispatch(error);
    }

    /// Drive `provider` until it shuts down or the store is closed.
    pub async fn connect<P: IdentityProvider>(&self, mut provider: P) {
        while let Some(item) = provider.next_event().await {
            if self.inner.closed.get() {
                break;
            }
            match item {
                Ok(ev) => self.apply(ev.event, ev.session),
                Err(error) => self.report(error),
            }
        }
        tracing::debug!("Identity provider stream ended");
    }

    /// Tear the store down: release every subscription and ignore later events.
    pub fn close(&self) {
        self.inner.closed.set(true);
        self.inner.changes.clear();
        self.inner.diagnostics.clear();
        *self.inner.current.borrow_mut() = None;
    }

    /// Number of live change subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.changes.len()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::provider::channel_provider;
    use crate::auth::session::Identity;

    fn session(id: &str) -> Session {
        Session::new(format!("token-{id}"), Identity::new(id))
    }

    type Seen = Rc<RefCell<Vec<(AuthEvent, Option<String>)>>>;

    fn record(store: &SessionStore) -> (Seen, Subscription) {
        let seen: Seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let sub = store.on_session_change(move |event, session| {
            sink.borrow_mut()
                .push((event, session.map(|s| s.user_id().to_string())));
        });
        (seen, sub)
    }

    #[test]
    fn snapshot_starts_empty() {
        let store = SessionStore::new();
        assert!(store.current_session().is_none());
    }

    #[test]
    fn apply_updates_snapshot() {
        let store = SessionStore::new();
        store.apply(AuthEvent::SignedIn, Some(session("a")));
        assert_eq!(store.current_session().unwrap().user_id().as_str(), "a");

        store.apply(AuthEvent::SignedOut, None);
        assert!(store.current_session().is_none());
    }

    #[test]
    fn subscribers_see_events_in_order() {
        let store = SessionStore::new();
        let (seen, _sub) = record(&store);

        store.apply(AuthEvent::InitialSession, None);
        store.apply(AuthEvent::SignedIn, Some(session("a")));
        store.apply(AuthEvent::TokenRefreshed, Some(session("a")));
        store.apply(AuthEvent::SignedOut, None);

        assert_eq!(
            *seen.borrow(),
            vec![
                (AuthEvent::InitialSession, None),
                (AuthEvent::SignedIn, Some("a".to_string())),
                (AuthEvent::TokenRefreshed, Some("a".to_string())),
                (AuthEvent::SignedOut, None),
            ]
        );
    }

    #[test]
    fn cancelled_subscriber_gets_nothing_after_cancel() {
        let store = SessionStore::new();
        let (seen, sub) = record(&store);

        store.apply(AuthEvent::SignedIn, Some(session("a")));
        store.apply(AuthEvent::TokenRefreshed, Some(session("a")));
        sub.cancel();
        store.apply(AuthEvent::SignedOut, None);

        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn provider_errors_go_to_diagnostics_only() {
        let store = SessionStore::new();
        let (seen, _sub) = record(&store);
        let errors = Rc::new(RefCell::new(Vec::new()));
        let sink = errors.clone();
        let _diag = store.on_diagnostic(move |e| sink.borrow_mut().push(e.clone()));

        store.apply(AuthEvent::SignedIn, Some(session("a")));
        store.report(ProviderError::Unavailable("offline".into()));

        assert_eq!(store.current_session().unwrap().user_id().as_str(), "a");
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(
            *errors.borrow(),
            vec![ProviderError::Unavailable("offline".into())]
        );
    }

    #[test]
    fn close_releases_subscribers() {
        let store = SessionStore::new();
        let (seen, _sub) = record(&store);
        store.apply(AuthEvent::SignedIn, Some(session("a")));

        store.close();
        store.apply(AuthEvent::SignedIn, Some(session("b")));

        assert!(store.is_closed());
        assert!(store.current_session().is_none());
        assert_eq!(seen.borrow().len(), 1);
    }

    #[tokio::test]
    async fn connect_pumps_provider_events() {
        let store = SessionStore::new();
        let (seen, _sub) = record(&store);
        let (handle, provider) = channel_provider();

        handle.emit(AuthEvent::InitialSession, None);
        handle.emit(AuthEvent::SignedIn, Some(session("a")));
        handle.fail(ProviderError::Unavailable("flaky".into()));
        handle.emit(AuthEvent::TokenRefreshed, Some(session("a")));
        drop(handle);

        store.connect(provider).await;

        let events: Vec<AuthEvent> = seen.borrow().iter().map(|(e, _)| *e).collect();
        assert_eq!(
            events,
            vec![
                AuthEvent::InitialSession,
                AuthEvent::SignedIn,
                AuthEvent::TokenRefreshed
            ]
        );
        assert_eq!(store.current_session().unwrap().user_id().as_str(), "a");
    }
}
