//! [`ProfileStore`] backed by the profile server functions.
//!
//! This is the store the browser uses: every call is an HTTP round trip to
//! [`crate::get_profile`] / [`crate::create_profile`], which run against
//! [`crate::db::PgProfileStore`] on the server.

use store::{Profile, ProfileStore, StoreError, UserId};

use crate::InsertStatus;

/// Client-side profile store talking to the server.
#[derive(Clone, Debug, Default)]
pub struct RemoteProfileStore;

impl RemoteProfileStore {
    pub fn new() -> Self {
        Self
    }
}

fn insert_result(id: UserId, status: InsertStatus) -> Result<(), StoreError> {
    match status {
        InsertStatus::Inserted => Ok(()),
        InsertStatus::Duplicate => Err(StoreError::DuplicateKey(id)),
    }
}

impl ProfileStore for RemoteProfileStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Profile>, StoreError> {
        crate::get_profile(id.to_string())
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn insert(&self, profile: Profile) -> Result<(), StoreError> {
        let id = profile.id.clone();
        let status = crate::create_profile(profile)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        insert_result(id, status)
    }
}
