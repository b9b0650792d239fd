pub mod movie_card;
pub mod navbar;
pub mod profile;
pub mod scope;
pub mod state;
pub mod update_profile;
pub mod welcome;


use std::time::Duration;

/// How long transient notifications stay on screen.
pub const NOTIFY_DURATION: Duration = Duration::from_secs(2);

// Re-export the views so the binary can build them from one place.
pub use movie_card::MovieCard;
pub use navbar::NavBar;
pub use profile::ProfileView;
pub use scope::ViewScope;
pub use state::AppState;
pub use update_profile::UpdateProfileView;
pub use welcome::WelcomePage;
