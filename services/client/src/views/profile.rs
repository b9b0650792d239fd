//! services/client/src/views/profile.rs
//!
//! The profile page: shows the current user and handles account deletion.

use crate::views::{scope::ViewScope, state::AppState, NOTIFY_DURATION};
use myflix_core::domain::{Dialog, Route, User};
use myflix_core::ports::PortResult;
use tracing::info;

pub const DELETE_PROMPT: &str =
    "Are you sure you want to delete your account? This cannot be undone.";

pub struct ProfileView {
    state: AppState,
    scope: ViewScope,
    pub user: Option<User>,
}

impl ProfileView {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            scope: ViewScope::new(),
            user: None,
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub async fn init(&mut self) -> PortResult<()> {
        self.get_user().await?;
        Ok(())
    }

    pub async fn get_user(&mut self) -> PortResult<&User> {
        let user = self.scope.run(self.state.api.get_user()).await?;
        info!(user = %user.username, "Profile loaded.");
        Ok(&*self.user.insert(user))
    }

    pub fn open_update_profile_dialog(&self) {
        self.state.shell.open_dialog(Dialog::UpdateProfile);
    }

    /// Deletes the account after confirmation. Returns `false` if the user backed out.
    ///
    /// The session is only cleared once the server has accepted the deletion.
    pub async fn delete_profile(&mut self) -> PortResult<bool> {
        if !self.state.shell.confirm(DELETE_PROMPT) {
            return Ok(false);
        }

        let confirmation = self.scope.run(self.state.api.delete_user()).await?;
        info!(
            message = confirmation.message.as_deref().unwrap_or(""),
            "Account deleted."
        );

        self.state.session.clear().await?;
        self.user = None;
        self.state.shell.navigate(Route::Welcome);
        self.state.shell.notify(
            "You have successfully deleted your account!",
            "OK",
            NOTIFY_DURATION,
        );
        Ok(true)
    }
}
