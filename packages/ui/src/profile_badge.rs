//! Signed-in indicator for the navigation bar.

use api::ProfileState;
use dioxus::prelude::*;

use crate::auth::use_profile;

/// Shows who is signed in.
///
/// - **Loading**: nothing
/// - **Profile**: the profile's display name
/// - **No profile**: "Not signed in"
#[component]
pub fn ProfileBadge() -> Element {
    let profile = use_profile();

    match profile() {
        ProfileState::Uninitialized | ProfileState::Loading => rsx! {},
        ProfileState::Ready(Some(profile)) => {
            let name = profile.display_name().to_string();
            rsx! {
                span {
                    class: "profile-badge profile-badge--signed-in",
                    title: "{profile.role}",
                    "{name}"
                }
            }
        }
        ProfileState::Ready(None) => rsx! {
            span {
                class: "profile-badge profile-badge--anonymous",
                "Not signed in"
            }
        },
    }
}
