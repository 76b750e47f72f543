//! Landing view for the identity provider's redirect (email link / OAuth).

use dioxus::prelude::*;
use ui::use_auth_callback;

use crate::Route;

/// Waits for the SDK to report the sign-in outcome, then replaces itself with home.
#[component]
pub fn AuthCallback() -> Element {
    let nav = use_navigator();

    use_auth_callback(move |home| {
        let target = home.parse::<Route>().unwrap_or(Route::Home {});
        nav.replace(target);
    });

    rsx! {
        p { class: "auth-callback", "Signing you in..." }
    }
}
