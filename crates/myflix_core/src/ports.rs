//! crates/myflix_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! views to be independent of the concrete HTTP client, storage backend and
//! terminal or GUI host.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::{
    AuthResult, Confirmation, Credentials, Dialog, Director, Genre, Movie, NewUser,
    ProfileUpdate, Route, Session, User,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
///
/// Every failure of the remote API collapses into `RequestFailed`; the status
/// code and body only ever reach the logs.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Something bad happened; please try again later.")]
    RequestFailed,
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("Request cancelled")]
    Cancelled,
    #[error("Session storage error: {0}")]
    Storage(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable holder of the current token and username.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn set(&self, token: &str, username: &str) -> PortResult<()>;

    async fn get(&self) -> PortResult<Session>;

    async fn clear(&self) -> PortResult<()>;
}

/// The remote movie API, one method per endpoint.
///
/// Implementations read the session at call time for every authenticated
/// operation.
#[async_trait]
pub trait MovieApi: Send + Sync {
    // --- Public ---
    async fn register(&self, details: &NewUser) -> PortResult<User>;

    async fn login(&self, credentials: &Credentials) -> PortResult<AuthResult>;

    // --- Catalog ---
    async fn list_movies(&self) -> PortResult<Vec<Movie>>;

    async fn get_movie(&self, title: &str) -> PortResult<Movie>;

    async fn get_director(&self, name: &str) -> PortResult<Director>;

    async fn get_genre(&self, name: &str) -> PortResult<Genre>;

    // --- Current User ---
    async fn get_user(&self) -> PortResult<User>;

    async fn list_favorites(&self) -> PortResult<Vec<String>>;

    async fn add_favorite(&self, movie_id: &str) -> PortResult<User>;

    async fn update_user(&self, update: &ProfileUpdate) -> PortResult<User>;

    async fn delete_user(&self) -> PortResult<Confirmation>;

    async fn remove_favorite(&self, movie_id: &str) -> PortResult<User>;
}

/// The host that renders views: router, dialog host and notification bar.
pub trait UiShell: Send + Sync {
    fn navigate(&self, route: Route);

    fn open_dialog(&self, dialog: Dialog);

    /// Shows a transient notification with a dismiss action label.
    fn notify(&self, message: &str, action: &str, duration: Duration);

    /// Asks the user a yes/no question.
    fn confirm(&self, prompt: &str) -> bool;
}
