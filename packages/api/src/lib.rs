//! # API crate — session and profile plumbing for Canopy
//!
//! Everything between the identity provider and the rendering layer lives here,
//! together with the two Dioxus server functions the browser uses to reach the
//! `profiles` table.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`auth`] | — | Session model, [`SessionStore`], identity provider boundary, auth callback handling, configuration |
//! | [`profile`] | — | [`Provisioner`] (create-once profiles) and [`ProfileContext`] (profile state for the UI) |
//! | [`notify`] | — | Ordered single-threaded fan-out used by both of the above |
//! | [`db`] | `server` | PostgreSQL pool (lazy `OnceCell` singleton) and [`db::PgProfileStore`] |
//! | [`remote`] | — | [`RemoteProfileStore`], the client-side store calling the server functions |
//!
//! ## Server functions exposed here
//!
//! Every public `async fn` in this file is a Dioxus server function, compiled twice:
//! once with full server logic (behind `#[cfg(feature = "server")]`) and once as a
//! thin client stub that forwards the call over HTTP.
//!
//! - `get_profile` — load a profile by identity id
//! - `create_profile` — insert a profile, reporting a duplicate id instead of failing

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

pub mod auth;
pub mod db;
pub mod error;
pub mod notify;
pub mod profile;
pub mod remote;
mod timer;

pub use auth::{AuthConfig, AuthEvent, Identity, Session, SessionBootstrap, SessionStore};
pub use error::{ProviderError, ProvisionError};
pub use notify::Subscription;
pub use profile::{ProfileContext, ProfileFeed, ProfileState, ProvisionOutcome, Provisioner};
pub use remote::RemoteProfileStore;
pub use store::{Profile, UserId};

/// Outcome of [`create_profile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertStatus {
    Inserted,
    /// A profile with this id already existed; nothing was written.
    Duplicate,
}

/// Load the profile for an identity id.
#[cfg(feature = "server")]
#[get("/api/profiles/:id")]
pub async fn get_profile(id: String) -> Result<Option<Profile>, ServerFnError> {
    let pool = db::get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    db::PgProfileStore::new(pool.clone())
        .fetch(&UserId(id))
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))
}

#[cfg(not(feature = "server"))]
#[get("/api/profiles/:id")]
pub async fn get_profile(id: String) -> Result<Option<Profile>, ServerFnError> {
    Ok(None)
}

/// Insert a new profile. An existing id is reported as [`InsertStatus::Duplicate`].
#[cfg(feature = "server")]
#[post("/api/profiles")]
pub async fn create_profile(profile: Profile) -> Result<InsertStatus, ServerFnError> {
    use store::StoreError;

    if profile.id.as_str().trim().is_empty() {
        return Err(ServerFnError::new("Profile id is required"));
    }
    // TODO: verify the caller's access token against profile.id before inserting.
    // Roles are never chosen by the client.
    let profile = Profile::new(profile.id, profile.name);

    let pool = db::get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    match db::PgProfileStore::new(pool.clone()).create(profile).await {
        Ok(()) => Ok(InsertStatus::Inserted),
        Err(StoreError::DuplicateKey(_)) => Ok(InsertStatus::Duplicate),
        Err(e) => Err(ServerFnError::new(e.to_string())),
    }
}

#[cfg(not(feature = "server"))]
#[post("/api/profiles")]
pub async fn create_profile(profile: Profile) -> Result<InsertStatus, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}
