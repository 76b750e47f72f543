//! Profile page for the signed-in user.

use api::ProfileState;
use dioxus::prelude::*;
use ui::use_profile;

#[component]
pub fn Profile() -> Element {
    let profile = use_profile();

    match profile() {
        ProfileState::Uninitialized | ProfileState::Loading => rsx! {
            p { "Loading..." }
        },
        ProfileState::Ready(None) => rsx! {
            p { "Sign in to see your profile." }
        },
        ProfileState::Ready(Some(profile)) => {
            let name = profile.display_name().to_string();
            rsx! {
                h1 { "{name}" }
                p { "Role: {profile.role}" }
            }
        }
    }
}
