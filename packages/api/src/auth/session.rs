//! Session data types.
//!
//! Everything here is produced by the identity provider. The application reads
//! these values but never creates, refreshes or persists a session on its own.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use store::UserId;

/// Metadata key holding the preferred display name.
pub const METADATA_NAME_KEY: &str = "name";
/// Metadata key used by OAuth providers for the full name.
pub const METADATA_FULL_NAME_KEY: &str = "full_name";

/// Lifecycle events emitted by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEvent {
    /// First report after the provider client starts, with or without a session.
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
    PasswordRecovery,
}

impl AuthEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitialSession => "initial_session",
            Self::SignedIn => "signed_in",
            Self::SignedOut => "signed_out",
            Self::TokenRefreshed => "token_refreshed",
            Self::UserUpdated => "user_updated",
            Self::PasswordRecovery => "password_recovery",
        }
    }
}

impl std::fmt::Display for AuthEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated principal behind a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub email: Option<String>,
    /// Provider-supplied user metadata (`name`, `full_name`, avatar, ...).
    #[serde(default, alias = "user_metadata")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Identity {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            email: None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Non-empty string value stored under `key` in the metadata.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Best display name available: `name`, then `full_name`, then the local part
    /// of the email address.
    pub fn display_name(&self) -> Option<&str> {
        self.metadata_str(METADATA_NAME_KEY)
            .or_else(|| self.metadata_str(METADATA_FULL_NAME_KEY))
            .or_else(|| self.email_local_part())
    }

    fn email_local_part(&self) -> Option<&str> {
        let email = self.email.as_deref()?;
        let local = email.split('@').next().unwrap_or(email);
        (!local.is_empty()).then_some(local)
    }
}

/// Authenticated session issued by the identity provider.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Expiry as unix seconds, if the provider reported one.
    pub expires_at: Option<i64>,
    pub user: Identity,
}

impl Session {
    pub fn new(access_token: impl Into<String>, user: Identity) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
            user,
        }
    }

    pub fn with_expiry(mut self, expires_at: i64) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }

    /// Whether the access token has expired at `now` (unix seconds).
    /// Sessions without an expiry never expire on the client side.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

// Tokens stay out of logs.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}
