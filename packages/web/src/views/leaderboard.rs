use dioxus::prelude::*;

#[component]
pub fn Leaderboard() -> Element {
    rsx! {
        h1 { "Leaderboard" }
    }
}
