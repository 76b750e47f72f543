//! # ProfileStore — keyed persistence for [`Profile`] records
//!
//! The provisioning flow only ever needs two operations: look a profile up by id and
//! insert a new one. Implementations live elsewhere: [`crate::MemoryStore`] here, a
//! Postgres-backed store and an HTTP (server function) store in the `api` crate.
//!
//! ## Uniqueness
//!
//! The store is the sole arbiter of the one-profile-per-identity invariant. An insert
//! for an id that already has a row must fail with [`StoreError::DuplicateKey`] and
//! leave the existing row untouched. Callers treat that as "someone else created it".

use crate::models::{Profile, UserId};

/// Errors returned by a [`ProfileStore`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// A profile with this id already exists.
    #[error("profile {0} already exists")]
    DuplicateKey(UserId),

    /// The backing store could not be reached or rejected the request.
    #[error("profile store unavailable: {0}")]
    Unavailable(String),

    /// The operation did not finish within the configured timeout.
    #[error("profile store timed out")]
    Timeout,
}

/// Async trait for reading and creating profiles.
pub trait ProfileStore {
    /// Fetch at most one profile whose id equals `id`.
    fn find_by_id(
        &self,
        id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<Profile>, StoreError>>;

    /// Insert a new profile. Fails with [`StoreError::DuplicateKey`] if the id exists.
    fn insert(
        &self,
        profile: Profile,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
}
