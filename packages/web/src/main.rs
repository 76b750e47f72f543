use dioxus::prelude::*;

use api::auth::channel_provider;
use api::{AuthConfig, SessionStore};
use ui::{ProfileProvider, SessionProvider};
use views::{About, AuthCallback, Home, Leaderboard, Profile};

mod bridge;
mod views;

/// Auth settings shipped with the app.
const CANOPY_TOML: &str = include_str!("../canopy.toml");

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Home {},
    #[route("/leaderboard")]
    Leaderboard {},
    #[route("/profile")]
    Profile {},
    #[route("/about")]
    About {},
    #[route("/auth/callback")]
    AuthCallback {},
}

fn main() {
    #[cfg(feature = "server")]
    {
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(launch_server());
    }

    #[cfg(not(feature = "server"))]
    {
        dioxus::launch(App);
    }
}

#[cfg(feature = "server")]
async fn launch_server() {
    use dioxus::server::{DioxusRouterExt, ServeConfig};

    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt().try_init();

    // Initialize database pool
    let pool = api::db::get_pool()
        .await
        .expect("Failed to connect to database");

    // Run migrations
    sqlx::migrate!("../api/migrations")
        .run(pool)
        .await
        .expect("Failed to run migrations");

    let router = axum::Router::new().serve_dioxus_application(ServeConfig::new(), App);

    // Use the address from dx serve or default to localhost:8080
    let addr = dioxus::cli_config::fullstack_address_or_localhost();
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router.into_make_service())
        .await
        .unwrap();
}

#[component]
fn App() -> Element {
    use_context_provider(|| AuthConfig::load(CANOPY_TOML));

    // One session store per application instance, fed by the identity provider SDK.
    let store = use_hook(|| {
        let store = SessionStore::new();
        let (handle, provider) = channel_provider();

        #[cfg(target_arch = "wasm32")]
        {
            if let Err(e) = bridge::install(handle) {
                tracing::error!("Failed to install auth bridge: {:?}", e);
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            drop(handle);
        }

        let pump = store.clone();
        spawn(async move { pump.connect(provider).await });
        store
    });

    rsx! {
        SessionProvider { store,
            ProfileProvider {
                Router::<Route> {}
            }
        }
    }
}
