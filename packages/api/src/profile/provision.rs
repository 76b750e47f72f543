//! # Profile provisioning
//!
//! [`Provisioner::ensure_profile`] makes sure the signed-in identity has exactly one
//! [`Profile`]. It looks the id up first and only inserts when nothing is there, so
//! repeated calls for the same identity never write twice.
//!
//! Two tabs can still race: both see "not found" and both insert. The profile store
//! rejects the second insert with [`StoreError::DuplicateKey`], which is reported as
//! [`ProvisionOutcome::AlreadyExists`]. Either way one profile exists afterwards.

use std::time::Duration;

use store::{Profile, ProfileStore, StoreError, UserId};

use crate::auth::Identity;
use crate::error::ProvisionError;
use crate::timer::with_timeout;

/// What [`Provisioner::ensure_profile`] found or did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// This call inserted the profile.
    Created,
    /// A profile was already there, or another client inserted it first.
    AlreadyExists,
}

/// Build the profile a first-time identity gets: default role, derived name.
pub fn new_profile_for(identity: &Identity) -> Profile {
    Profile::new(
        identity.id.clone(),
        identity.display_name().map(str::to_string),
    )
}

/// Creates profiles on first sight of an identity.
#[derive(Debug, Clone)]
pub struct Provisioner<S> {
    store: S,
    timeout: Option<Duration>,
}

impl<S: ProfileStore> Provisioner<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            timeout: None,
        }
    }

    /// Bound every store call; `None` waits indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Make sure `identity` has a profile, inserting one if none exists.
    pub async fn ensure_profile(
        &self,
        identity: &Identity,
    ) -> Result<ProvisionOutcome, ProvisionError> {
        let existing = with_timeout(self.timeout, self.store.find_by_id(&identity.id)).await?;
        if existing.is_some() {
            return Ok(ProvisionOutcome::AlreadyExists);
        }

        let profile = new_profile_for(identity);
        match with_timeout(self.timeout, self.store.insert(profile)).await {
            Ok(()) => {
                tracing::info!(user_id = %identity.id, "Created profile");
                Ok(ProvisionOutcome::Created)
            }
            Err(StoreError::DuplicateKey(_)) => {
                tracing::debug!(user_id = %identity.id, "Profile created concurrently");
                Ok(ProvisionOutcome::AlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read the profile for `id`.
    pub async fn fetch_profile(&self, id: &UserId) -> Result<Option<Profile>, ProvisionError> {
        Ok(with_timeout(self.timeout, self.store.find_by_id(id)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::MemoryStore;

    /// Suspends between the lookup and its result so concurrent callers interleave.
    #[derive(Clone, Default)]
    struct YieldingStore {
        inner: MemoryStore,
    }

    impl ProfileStore for YieldingStore {
        async fn find_by_id(&self, id: &UserId) -> Result<Option<Profile>, StoreError> {
            let found = self.inner.find_by_id(id).await;
            tokio::task::yield_now().await;
            found
        }

        async fn insert(&self, profile: Profile) -> Result<(), StoreError> {
            self.inner.insert(profile).await
        }
    }

    struct StalledStore;

    impl ProfileStore for StalledStore {
        async fn find_by_id(&self, _id: &UserId) -> Result<Option<Profile>, StoreError> {
            std::future::pending().await
        }

        async fn insert(&self, _profile: Profile) -> Result<(), StoreError> {
            std::future::pending().await
        }
    }

    struct BrokenStore;

    impl ProfileStore for BrokenStore {
        async fn find_by_id(&self, _id: &UserId) -> Result<Option<Profile>, StoreError> {
            Ok(None)
        }

        async fn insert(&self, _profile: Profile) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("connection reset".into()))
        }
    }

    async fn stored_name(store: &MemoryStore, id: &str) -> Option<String> {
        store
            .find_by_id(&UserId::new(id))
            .await
            .unwrap()
            .unwrap()
            .name
    }

    #[tokio::test]
    async fn test_repeated_calls_insert_once() {
        let store = MemoryStore::new();
        let provisioner = Provisioner::new(store.clone());
        let identity = Identity::new("u-1").with_email("ann@x.com");

        assert_eq!(
            provisioner.ensure_profile(&identity).await.unwrap(),
            ProvisionOutcome::Created
        );
        for _ in 0..5 {
            assert_eq!(
                provisioner.ensure_profile(&identity).await.unwrap(),
                ProvisionOutcome::AlreadyExists
            );
        }
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_existing_profile_is_not_rewritten() {
        let store = MemoryStore::new();
        let mut admin = Profile::new(UserId::new("u-1"), Some("Root".into()));
        admin.role = "admin".into();
        store.insert(admin.clone()).await.unwrap();

        let identity = Identity::new("u-1").with_metadata("name", "Someone Else");
        Provisioner::new(store.clone())
            .ensure_profile(&identity)
            .await
            .unwrap();

        let kept = store.find_by_id(&UserId::new("u-1")).await.unwrap().unwrap();
        assert_eq!(kept, admin);
    }

    #[tokio::test]
    async fn test_concurrent_calls_tolerate_duplicate_key() {
        let store = YieldingStore::default();
        let first = Provisioner::new(store.clone());
        let second = Provisioner::new(store.clone());
        let identity = Identity::new("u-1").with_email("ann@x.com");

        let (a, b) = tokio::join!(
            first.ensure_profile(&identity),
            second.ensure_profile(&identity)
        );

        let mut outcomes = vec![a.unwrap(), b.unwrap()];
        outcomes.sort_by_key(|o| *o == ProvisionOutcome::AlreadyExists);
        assert_eq!(
            outcomes,
            vec![ProvisionOutcome::Created, ProvisionOutcome::AlreadyExists]
        );
        assert_eq!(store.inner.len(), 1);
    }

    #[tokio::test]
    async fn test_name_derivation_precedence() {
        let store = MemoryStore::new();
        let provisioner = Provisioner::new(store.clone());

        let cases = [
            (
                Identity::new("a")
                    .with_email("ann@x.com")
                    .with_metadata("name", "Ann"),
                Some("Ann"),
            ),
            (
                Identity::new("b").with_metadata("full_name", "Ann B"),
                Some("Ann B"),
            ),
            (Identity::new("c").with_email("bob@x.com"), Some("bob")),
            (Identity::new("d"), None),
        ];

        for (identity, expected) in cases {
            provisioner.ensure_profile(&identity).await.unwrap();
            assert_eq!(
                stored_name(&store, identity.id.as_str()).await.as_deref(),
                expected
            );
        }

        let created = store.find_by_id(&UserId::new("d")).await.unwrap().unwrap();
        assert_eq!(created.role, "user");
    }

    #[tokio::test]
    async fn test_other_insert_failures_are_errors() {
        let err = Provisioner::new(BrokenStore)
            .ensure_profile(&Identity::new("u-1"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ProvisionError::Store(StoreError::Unavailable("connection reset".into()))
        );
    }

    #[tokio::test]
    async fn test_timeout_bounds_store_calls() {
        let provisioner =
            Provisioner::new(StalledStore).with_timeout(Some(Duration::from_millis(10)));

        let err = provisioner
            .ensure_profile(&Identity::new("u-1"))
            .await
            .unwrap_err();
        assert_eq!(err, ProvisionError::Store(StoreError::Timeout));

        let err = provisioner
            .fetch_profile(&UserId::new("u-1"))
            .await
            .unwrap_err();
        assert_eq!(err, ProvisionError::Store(StoreError::Timeout));
    }
}
