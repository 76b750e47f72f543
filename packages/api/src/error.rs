//! Error types for the session and profile plumbing.
//!
//! None of these reach the rendering layer: provider failures keep the last known
//! session, provisioning failures degrade to "no profile". They exist so the
//! failures stay observable through logs, diagnostics and tests.

use store::StoreError;

/// Failure reported by the identity provider connection.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// The provider could not be reached (network down, SDK not loaded, ...).
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    /// The provider answered with something the client could not understand.
    #[error("identity provider protocol error: {0}")]
    Protocol(String),
}

/// Failure while making sure a profile exists.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProvisionError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
