//! This crate contains all shared UI for the workspace.

mod auth;
pub use auth::{use_auth_callback, use_profile, use_session_store, ProfileProvider, SessionProvider};

mod profile_badge;
pub use profile_badge::ProfileBadge;
