mod about;
pub use about::About;

mod auth_callback;
pub use auth_callback::AuthCallback;

mod home;
pub use home::Home;

mod leaderboard;
pub use leaderboard::Leaderboard;

mod profile;
pub use profile::Profile;
