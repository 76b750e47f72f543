//! Session plumbing between the identity provider and the application.

mod bootstrap;
mod config;
mod provider;
mod session;
mod session_store;

pub use bootstrap::{Navigator, SessionBootstrap};
pub use config::{AuthConfig, RoutesConfig, StoreConfig};
pub use provider::{channel_provider, ChannelProvider, IdentityProvider, ProviderEvent, ProviderHandle};
pub use session::{AuthEvent, Identity, Session, METADATA_FULL_NAME_KEY, METADATA_NAME_KEY};
pub use session_store::{SessionChange, SessionStore};
