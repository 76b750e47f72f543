//! # Profile records
//!
//! A [`Profile`] is the application-level record that extends an identity issued by
//! the identity provider. Its `id` is the identity's id, so the two are related 1:1;
//! nothing in this crate enforces that beyond using the same [`UserId`] for both.
//!
//! | Field | Meaning |
//! |-------|---------|
//! | `id` | The identity id ([`UserId`]), also the primary key of the `profiles` table. |
//! | `role` | Authorisation role. New profiles get [`DEFAULT_ROLE`] (`"user"`); admin tooling may change it. |
//! | `name` | Display name derived when the profile is created. `None` when nothing usable was available. |
//!
//! These types are `Serialize + Deserialize` so they can cross the server/client
//! boundary via Dioxus server functions.

use serde::{Deserialize, Serialize};

/// Role assigned to every newly provisioned profile.
pub const DEFAULT_ROLE: &str = "user";

/// Identity id issued by the identity provider (stable across sessions).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Application profile for an authenticated identity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub role: String,
    pub name: Option<String>,
}

impl Profile {
    /// A fresh profile with the default role.
    pub fn new(id: UserId, name: Option<String>) -> Self {
        Self {
            id,
            role: DEFAULT_ROLE.to_string(),
            name,
        }
    }

    /// Display name, falling back to the raw id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.id.as_str())
    }
}
