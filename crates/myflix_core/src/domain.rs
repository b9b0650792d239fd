//! crates/myflix_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any HTTP client or serialization format;
//! the adapters decode wire records and map them onto these types.

use chrono::NaiveDate;

//=========================================================================================
// Session
//=========================================================================================

/// The locally persisted login state: a bearer token and the username it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub username: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            username: Some(username.into()),
        }
    }
}

//=========================================================================================
// Catalog Records
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Director {
    pub name: String,
    pub bio: String,
    pub birth: Option<String>,
    pub death: Option<String>,
}

/// A single entry of the movie catalog, as served by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub description: String,
    pub genre: Genre,
    pub director: Director,
    pub image_path: Option<String>,
    pub featured: bool,
}

//=========================================================================================
// Users and Authentication
//=========================================================================================

// Represents a user - used throughout app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Option<String>,
    pub username: String,
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub favorite_movies: Vec<String>,
}

/// What a successful login hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub token: String,
    pub user: User,
}

// Only used for login - contains the plain password
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Details submitted when registering a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
}

/// Fields to change on the current user. `None` fields are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.password.is_none()
            && self.email.is_none()
            && self.birthday.is_none()
    }
}

/// The server's acknowledgement of an account deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Confirmation {
    pub message: Option<String>,
}

//=========================================================================================
// UI Shell Vocabulary
//=========================================================================================

/// The named routes of the application shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Movies,
    Profile,
    Welcome,
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::Movies => "movies",
            Route::Profile => "profile",
            Route::Welcome => "welcome",
        }
    }
}

/// A modal dialog together with the payload it displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Genre { name: String, description: String },
    Director { name: String, bio: String, birth: Option<String> },
    Synopsis { title: String, description: String },
    UpdateProfile,
    Registration,
    Login,
}

impl Dialog {
    /// Width in pixels the host should give the dialog.
    pub fn width(&self) -> u32 {
        match self {
            Dialog::Genre { .. } | Dialog::Director { .. } | Dialog::Synopsis { .. } => 500,
            Dialog::UpdateProfile => 300,
            Dialog::Registration | Dialog::Login => 280,
        }
    }
}
