use dioxus::prelude::*;
use ui::ProfileBadge;

#[component]
pub fn Home() -> Element {
    rsx! {
        header {
            h1 { "Canopy" }
            ProfileBadge {}
        }
        p { "Track the trees you have planted and see how your impact grows." }
    }
}
