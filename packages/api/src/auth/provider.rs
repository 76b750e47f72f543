//! Identity provider boundary.
//!
//! The provider SDK (magic link, OAuth redirect handling, token refresh) lives outside
//! this crate. It is seen only as an ordered source of [`ProviderEvent`]s. On the web
//! the JS bridge pushes SDK callbacks into a [`ProviderHandle`]; tests do the same.

use tokio::sync::mpsc;

use super::session::{AuthEvent, Session};
use crate::error::ProviderError;

/// One lifecycle notification from the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEvent {
    pub event: AuthEvent,
    pub session: Option<Session>,
}

impl ProviderEvent {
    /// Decode an SDK callback: the event name (`"signed_in"`, ...) and the session
    /// as JSON, absent or `null` when there is none.
    pub fn from_json(event: &str, session: Option<&str>) -> Result<Self, ProviderError> {
        let event: AuthEvent = serde_json::from_value(serde_json::Value::String(event.to_string()))
            .map_err(|e| ProviderError::Protocol(format!("unknown auth event {event:?}: {e}")))?;
        let session = match session {
            Some(json) => serde_json::from_str::<Option<Session>>(json)
                .map_err(|e| ProviderError::Protocol(format!("malformed session: {e}")))?,
            None => None,
        };
        Ok(Self { event, session })
    }
}

/// Ordered source of provider events.
pub trait IdentityProvider {
    /// Next event or connection error; `None` once the provider has shut down.
    fn next_event(
        &mut self,
    ) -> impl std::future::Future<Output = Option<Result<ProviderEvent, ProviderError>>>;
}

/// Create a channel-backed provider and the handle that feeds it.
pub fn channel_provider() -> (ProviderHandle, ChannelProvider) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ProviderHandle { tx }, ChannelProvider { rx })
}

/// Sending half of [`channel_provider`]. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ProviderHandle {
    tx: mpsc::UnboundedSender<Result<ProviderEvent, ProviderError>>,
}

impl ProviderHandle {
    /// Forward a lifecycle event. Returns `false` once the provider side is gone.
    pub fn emit(&self, event: AuthEvent, session: Option<Session>) -> bool {
        self.tx.send(Ok(ProviderEvent { event, session })).is_ok()
    }

    /// Forward a connection failure.
    pub fn fail(&self, error: ProviderError) -> bool {
        self.tx.send(Err(error)).is_ok()
    }
}

/// Receiving half of [`channel_provider`].
#[derive(Debug)]
pub struct ChannelProvider {
    rx: mpsc::UnboundedReceiver<Result<ProviderEvent, ProviderError>>,
}

impl IdentityProvider for ChannelProvider {
    async fn next_event(&mut self) -> Option<Result<ProviderEvent, ProviderError>> {
        self.rx.recv().await
    }
}
