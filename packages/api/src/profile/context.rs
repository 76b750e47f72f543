//! # Profile context — the current user's profile for the UI
//!
//! [`ProfileContext`] turns session changes into a small state machine:
//!
//! ```text
//! Uninitialized ──none──────────────────────────────► Ready(None)
//!       │                                                 ▲
//!       └──session(A)──► Loading ──ensure + fetch──► Ready(Some(A) | None)
//! ```
//!
//! - A session for a *different* identity than the one last seen reloads.
//! - The same identity again (token refresh, metadata update) changes nothing.
//! - A cleared session goes straight to `Ready(None)` and forgets the profile.
//!
//! Failures never surface here: a provisioning or fetch error ends in
//! `Ready(None)` and a `warn!` log line.
//!
//! [`ProfileContext::attach`] connects the context to a [`SessionStore`]. The state
//! follows each session change as soon as it is reported; only the store calls are
//! queued, and [`ProfileFeed::run`] performs them one at a time. A load that has been
//! superseded by a later change (another identity, a sign-out) never publishes.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use store::{Profile, ProfileStore, UserId};
use tokio::sync::mpsc;

use super::provision::Provisioner;
use crate::auth::{Identity, Session, SessionStore};
use crate::notify::{Listeners, Subscription};

/// Lifecycle of the current user's profile.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ProfileState {
    #[default]
    Uninitialized,
    Loading,
    Ready(Option<Profile>),
}

impl ProfileState {
    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Self::Ready(profile) => profile.as_ref(),
            _ => None,
        }
    }

    /// `true` until the first `Ready` state, and while a profile loads.
    pub fn is_loading(&self) -> bool {
        !matches!(self, Self::Ready(_))
    }
}

/// Profile load for one observed identity. Only the newest load may publish.
struct Load {
    identity: Identity,
    generation: u64,
}

/// Shared, read-only profile state derived from session changes.
pub struct ProfileContext<S> {
    provisioner: Provisioner<S>,
    state: RefCell<ProfileState>,
    observed: RefCell<Option<UserId>>,
    generation: Cell<u64>,
    changes: Listeners<ProfileState>,
}

impl<S: ProfileStore + 'static> ProfileContext<S> {
    pub fn new(provisioner: Provisioner<S>) -> Self {
        Self {
            provisioner,
            state: RefCell::new(ProfileState::Uninitialized),
            observed: RefCell::new(None),
            generation: Cell::new(0),
            changes: Listeners::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> ProfileState {
        self.state.borrow().clone()
    }

    /// Be told about every transition, in order.
    pub fn subscribe(&self, handler: impl FnMut(&ProfileState) + 'static) -> Subscription {
        self.changes.subscribe(handler)
    }

    /// React to the session reported by the session store.
    pub async fn observe(&self, session: Option<&Session>) {
        if let Some(load) = self.begin(session) {
            self.load(load).await;
        }
    }

    /// Settle the state for `session` without touching the store. Returns the
    /// load to run when a new identity appeared.
    fn begin(&self, session: Option<&Session>) -> Option<Load> {
        let Some(session) = session else {
            self.observed.borrow_mut().take();
            self.generation.set(self.generation.get() + 1);
            self.transition(ProfileState::Ready(None));
            return None;
        };

        let id = session.user_id();
        if self.observed.borrow().as_ref() == Some(id) {
            return None;
        }
        *self.observed.borrow_mut() = Some(id.clone());
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.transition(ProfileState::Loading);

        Some(Load {
            identity: session.user.clone(),
            generation,
        })
    }

    async fn load(&self, load: Load) {
        let id = &load.identity.id;
        if !self.is_current(&load) {
            tracing::debug!(user_id = %id, "Skipping superseded profile load");
            return;
        }

        if let Err(error) = self.provisioner.ensure_profile(&load.identity).await {
            tracing::warn!(user_id = %id, %error, "Failed to provision profile");
        }
        let profile = match self.provisioner.fetch_profile(id).await {
            Ok(profile) => profile,
            Err(error) => {
                tracing::warn!(user_id = %id, %error, "Failed to fetch profile");
                None
            }
        };

        if !self.is_current(&load) {
            tracing::debug!(user_id = %id, "Dropping superseded profile load");
            return;
        }
        self.transition(ProfileState::Ready(profile));
    }

    fn is_current(&self, load: &Load) -> bool {
        self.generation.get() == load.generation
    }

    fn transition(&self, next: ProfileState) {
        if *self.state.borrow() == next {
            return;
        }
        tracing::debug!(state = ?next, "Profile state");
        *self.state.borrow_mut() = next.clone();
        self.changes.dispatch(next);
    }

    /// Follow `sessions`. The feed starts from the session current at this point
    /// unless a change arrives before [`ProfileFeed::run`] is first polled.
    pub fn attach(self: Rc<Self>, sessions: &SessionStore) -> ProfileFeed<S> {
        let (tx, rx) = mpsc::unbounded_channel();
        let context = self.clone();
        let subscription = sessions.on_session_change(move |_event, session| {
            if let Some(load) = context.begin(session) {
                let _ = tx.send(load);
            }
        });
        ProfileFeed {
            context: self,
            seed: sessions.current_session(),
            rx,
            _subscription: subscription,
        }
    }
}

/// Queue of profile loads feeding a [`ProfileContext`].
pub struct ProfileFeed<S> {
    context: Rc<ProfileContext<S>>,
    seed: Option<Session>,
    rx: mpsc::UnboundedReceiver<Load>,
    _subscription: Subscription,
}

impl<S: ProfileStore + 'static> ProfileFeed<S> {
    /// Run queued loads until the session store is closed.
    pub async fn run(mut self) {
        if self.context.state() == ProfileState::Uninitialized {
            let seed = self.seed.take();
            self.context.observe(seed.as_ref()).await;
        }
        while let Some(load) = self.rx.recv().await {
            self.context.load(load).await;
        }
        tracing::debug!("Session store closed, profile feed stopped");
    }
}
