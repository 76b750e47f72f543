use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::models::{Profile, UserId};
use crate::profile_store::{ProfileStore, StoreError};

/// In-memory ProfileStore for tests and offline development.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    profiles: Arc<Mutex<HashMap<UserId, Profile>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored profiles.
    pub fn len(&self) -> usize {
        self.profiles.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of every stored profile, ordered by id.
    pub fn profiles(&self) -> Vec<Profile> {
        let mut all: Vec<Profile> = self.profiles.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }
}

impl ProfileStore for MemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Profile>, StoreError> {
        Ok(self.profiles.lock().unwrap().get(id).cloned())
    }

    async fn insert(&self, profile: Profile) -> Result<(), StoreError> {
        let mut profiles = self.profiles.lock().unwrap();
        if profiles.contains_key(&profile.id) {
            return Err(StoreError::DuplicateKey(profile.id));
        }
        profiles.insert(profile.id.clone(), profile);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryStore::new();
        let id = UserId::new("u-1");

        assert!(store.find_by_id(&id).await.unwrap().is_none());

        store
            .insert(Profile::new(id.clone(), Some("Ann".into())))
            .await
            .unwrap();

        let found = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(found.name.as_deref(), Some("Ann"));
        assert_eq!(found.role, "user");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_insert_keeps_first_row() {
        let store = MemoryStore::new();
        let id = UserId::new("u-1");

        store
            .insert(Profile::new(id.clone(), Some("first".into())))
            .await
            .unwrap();
        let err = store
            .insert(Profile::new(id.clone(), Some("second".into())))
            .await
            .unwrap_err();

        assert_eq!(err, StoreError::DuplicateKey(id.clone()));
        assert_eq!(store.len(), 1);
        let kept = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(kept.name.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();

        other
            .insert(Profile::new(UserId::new("b"), None))
            .await
            .unwrap();
        store
            .insert(Profile::new(UserId::new("a"), None))
            .await
            .unwrap();

        let ids: Vec<_> = store.profiles().into_iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
