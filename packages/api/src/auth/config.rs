//! # Client auth configuration — `canopy.toml`
//!
//! ```toml
//! [routes]
//! home = "/"          # where the auth callback view sends the user
//!
//! [store]
//! timeout_ms = 10000  # bound for each profile store call; 0 = no timeout
//! ```
//!
//! Every section is optional; a missing or empty file is the default configuration.
//! The web app embeds its copy at build time and reads it with [`AuthConfig::load`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level auth configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub routes: RoutesConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Routes involved in the sign-in round trip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutesConfig {
    #[serde(default = "default_home_route")]
    pub home: String,
}

fn default_home_route() -> String {
    "/".to_string()
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            home: default_home_route(),
        }
    }
}

/// Profile store settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Per-call timeout in milliseconds. 0 disables the timeout.
    #[serde(default)]
    pub timeout_ms: u64,
}

impl AuthConfig {
    /// Builder method to set the home route.
    pub fn with_home_route(mut self, route: impl Into<String>) -> Self {
        self.routes.home = route.into();
        self
    }

    /// Builder method to bound profile store calls.
    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Store timeout, `None` when disabled.
    pub fn store_timeout(&self) -> Option<Duration> {
        (self.store.timeout_ms > 0).then(|| Duration::from_millis(self.store.timeout_ms))
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "canopy.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Parse `text`, falling back to the default configuration when it is malformed.
    pub fn load(text: &str) -> Self {
        match Self::from_toml(text) {
            Ok(config) => {
                tracing::debug!(
                    home = %config.routes.home,
                    timeout_ms = config.store.timeout_ms,
                    "Loaded auth config"
                );
                config
            }
            Err(error) => {
                tracing::warn!(file = Self::filename(), %error, "Invalid auth config, using defaults");
                Self::default()
            }
        }
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
