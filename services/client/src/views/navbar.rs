//! services/client/src/views/navbar.rs

use crate::views::state::AppState;
use myflix_core::domain::Route;
use myflix_core::ports::PortResult;
use tracing::info;

pub struct NavBar {
    state: AppState,
}

impl NavBar {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn go_to_movies(&self) {
        self.state.shell.navigate(Route::Movies);
    }

    pub fn go_to_profile(&self) {
        self.state.shell.navigate(Route::Profile);
    }

    /// Forgets the token and username, then returns to the welcome page.
    pub async fn log_out(&self) -> PortResult<()> {
        self.state.session.clear().await?;
        info!("Logged out.");
        self.state.shell.navigate(Route::Welcome);
        Ok(())
    }
}
