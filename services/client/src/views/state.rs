//! services/client/src/views/state.rs
//!
//! Defines the shared state every view is built from.

use myflix_core::ports::{MovieApi, SessionStore, UiShell};
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Views)
//=========================================================================================

/// The shared application state, created once at startup and handed to each view.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn MovieApi>,
    pub session: Arc<dyn SessionStore>,
    pub shell: Arc<dyn UiShell>,
}

impl AppState {
    pub fn new(
        api: Arc<dyn MovieApi>,
        session: Arc<dyn SessionStore>,
        shell: Arc<dyn UiShell>,
    ) -> Self {
        Self {
            api,
            session,
            shell,
        }
    }
}
