//! services/client/src/views/update_profile.rs
//!
//! The profile editor dialog.

use crate::views::{scope::ViewScope, state::AppState, NOTIFY_DURATION};
use myflix_core::domain::{ProfileUpdate, User};
use myflix_core::ports::PortResult;
use tracing::info;

pub struct UpdateProfileView {
    state: AppState,
    scope: ViewScope,
    pub user_data: ProfileUpdate,
}

impl UpdateProfileView {
    pub fn new(state: AppState, user_data: ProfileUpdate) -> Self {
        Self {
            state,
            scope: ViewScope::new(),
            user_data,
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Sends the edited fields. A rename is carried over into the session so
    /// later calls address the new username.
    pub async fn update_user(&self) -> PortResult<User> {
        let updated = self
            .scope
            .run(self.state.api.update_user(&self.user_data))
            .await?;

        let session = self.state.session.get().await?;
        if session.username.as_deref() != Some(updated.username.as_str()) {
            if let Some(token) = session.token.as_deref() {
                self.state.session.set(token, &updated.username).await?;
                info!(user = %updated.username, "Session username updated.");
            }
        }

        self.state
            .shell
            .notify("Successfully updated profile", "OK", NOTIFY_DURATION);
        Ok(updated)
    }
}
