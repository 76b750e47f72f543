//! Bridge from the identity provider's JS SDK into the session store.
//!
//! The page script registers the SDK's auth listener and forwards each callback to
//! `window.canopyAuth.event(name, sessionJson)`. Connection failures go to
//! `window.canopyAuth.error(message)`.

use api::auth::{ProviderEvent, ProviderHandle};

/// Decode one SDK callback and push it to the store. Undecodable payloads are
/// reported as provider errors. Returns `false` when the session store no longer listens.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) fn forward(handle: &ProviderHandle, event: &str, session: Option<&str>) -> bool {
    let delivered = match ProviderEvent::from_json(event, session) {
        Ok(ev) => handle.emit(ev.event, ev.session),
        Err(error) => handle.fail(error),
    };
    if !delivered {
        tracing::debug!(event, "Session store gone, dropped auth callback");
    }
    delivered
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn install(handle: ProviderHandle) -> Result<(), wasm_bindgen::JsValue> {
    use api::ProviderError;
    use wasm_bindgen::prelude::*;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let bridge = js_sys::Object::new();

    let events = handle.clone();
    let on_event = Closure::<dyn FnMut(String, Option<String>)>::new(
        move |event: String, session: Option<String>| {
            forward(&events, &event, session.as_deref());
        },
    );
    let on_error = Closure::<dyn FnMut(String)>::new(move |message: String| {
        if !handle.fail(ProviderError::Unavailable(message)) {
            tracing::debug!("Session store gone, dropped auth error");
        }
    });

    js_sys::Reflect::set(&bridge, &"event".into(), on_event.as_ref())?;
    js_sys::Reflect::set(&bridge, &"error".into(), on_error.as_ref())?;
    js_sys::Reflect::set(&window, &"canopyAuth".into(), &bridge)?;

    // Both callbacks live as long as the page.
    on_event.forget();
    on_error.forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::auth::{channel_provider, AuthEvent, IdentityProvider};
    use api::ProviderError;

    #[tokio::test]
    async fn forwards_events_and_protocol_errors() {
        let (handle, mut provider) = channel_provider();

        assert!(forward(&handle, "signed_in", Some(r#"{"access_token":"t","user":{"id":"u"}}"#)));
        assert!(forward(&handle, "mystery", None));

        let ev = provider.next_event().await.unwrap().unwrap();
        assert_eq!(ev.event, AuthEvent::SignedIn);
        assert_eq!(ev.session.unwrap().user_id().as_str(), "u");
        assert!(matches!(
            provider.next_event().await.unwrap(),
            Err(ProviderError::Protocol(_))
        ));
    }

    #[test]
    fn reports_when_store_is_gone() {
        let (handle, provider) = channel_provider();
        assert!(forward(&handle, "signed_out", None));

        drop(provider);
        assert!(!forward(&handle, "signed_out", None));
        assert!(!forward(&handle, "mystery", None));
    }
}
