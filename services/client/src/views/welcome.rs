//! services/client/src/views/welcome.rs
//!
//! The landing page and its two forms: sign up and log in.

use crate::views::{scope::ViewScope, state::AppState, NOTIFY_DURATION};
use myflix_core::domain::{AuthResult, Credentials, Dialog, NewUser, Route, User};
use myflix_core::ports::PortResult;
use tracing::{error, info};

pub struct WelcomePage {
    state: AppState,
    scope: ViewScope,
}

impl WelcomePage {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            scope: ViewScope::new(),
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    pub fn open_user_registration_dialog(&self) {
        self.state.shell.open_dialog(Dialog::Registration);
    }

    pub fn open_user_login_dialog(&self) {
        self.state.shell.open_dialog(Dialog::Login);
    }

    pub async fn register(&self, details: &NewUser) -> PortResult<User> {
        match self.scope.run(self.state.api.register(details)).await {
            Ok(user) => {
                info!(user = %user.username, "Registered.");
                self.state
                    .shell
                    .notify("User registration successful", "OK", NOTIFY_DURATION);
                Ok(user)
            }
            Err(e) => {
                self.state.shell.notify(&e.to_string(), "OK", NOTIFY_DURATION);
                Err(e)
            }
        }
    }

    /// Logs in and, only on success, stores the token and username.
    pub async fn login(&self, credentials: &Credentials) -> PortResult<AuthResult> {
        let auth = match self.scope.run(self.state.api.login(credentials)).await {
            Ok(auth) => auth,
            Err(e) => {
                error!(user = %credentials.username, "Login failed: {}", e);
                self.state.shell.notify(&e.to_string(), "OK", NOTIFY_DURATION);
                return Err(e);
            }
        };

        self.state
            .session
            .set(&auth.token, &auth.user.username)
            .await?;
        info!(user = %auth.user.username, "Logged in.");
        self.state.shell.navigate(Route::Movies);
        self.state
            .shell
            .notify("User login successful", "OK", NOTIFY_DURATION);
        Ok(auth)
    }
}
