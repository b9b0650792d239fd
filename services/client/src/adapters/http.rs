//! services/client/src/adapters/http.rs
//!
//! This module contains the HTTP adapter for the remote movie API. It is the
//! concrete implementation of the `MovieApi` port from the `core` crate and
//! owns every detail of the wire contract: paths, verbs, JSON field names and
//! the bearer header.

use async_trait::async_trait;
use chrono::NaiveDate;
use myflix_core::domain::{
    AuthResult, Confirmation, Credentials, Director, Genre, Movie, NewUser, ProfileUpdate, User,
};
use myflix_core::ports::{MovieApi, PortError, PortResult, SessionStore};
use reqwest::{header::AUTHORIZATION, Client, Method, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `MovieApi` port over HTTP.
#[derive(Clone)]
pub struct HttpMovieApi {
    client: Client,
    base_url: Url,
    session: Arc<dyn SessionStore>,
}

/// Whether a request carries the stored bearer token.
enum Auth {
    Public,
    Bearer(String),
}

impl HttpMovieApi {
    /// Creates a new `HttpMovieApi`. `base_url` must end with `/`.
    pub fn new(client: Client, base_url: Url, session: Arc<dyn SessionStore>) -> Self {
        Self {
            client,
            base_url,
            session,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    ///
    /// `.` and `..` are refused: the URL path would swallow them and the
    /// request would land on a different endpoint.
    fn endpoint(&self, segments: &[&str]) -> PortResult<Url> {
        if let Some(dot) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            error!("Refusing path segment {:?}", dot);
            return Err(PortError::RequestFailed);
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                error!("Base URL {} cannot carry a path", self.base_url);
                PortError::RequestFailed
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// The stored token, read fresh from the session store.
    async fn bearer(&self) -> PortResult<Auth> {
        let session = self.session.get().await?;
        let token = session.token.ok_or(PortError::NotLoggedIn)?;
        Ok(Auth::Bearer(token))
    }

    /// The stored token and username, for endpoints scoped to the current user.
    async fn user_scope(&self) -> PortResult<(Auth, String)> {
        let session = self.session.get().await?;
        match (session.token, session.username) {
            (Some(token), Some(username)) => Ok((Auth::Bearer(token), username)),
            _ => Err(PortError::NotLoggedIn),
        }
    }

    /// Builds, sends and unwraps a single request.
    ///
    /// Transport failures, non-2xx statuses and undecodable bodies are logged
    /// here and collapse into `PortError::RequestFailed`.
    async fn send(
        &self,
        method: Method,
        url: Url,
        auth: Auth,
        body: Option<Value>,
    ) -> PortResult<Value> {
        debug!(%method, path = url.path(), "Dispatching request");

        let mut request = self.client.request(method, url);
        if let Auth::Bearer(token) = &auth {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(|e| {
            error!("Some error occurred: {}", e);
            PortError::RequestFailed
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            error!("Some error occurred while reading the response: {}", e);
            PortError::RequestFailed
        })?;

        if !status.is_success() {
            error!("Error Status code {}, Error Body is: {}", status.as_u16(), text);
            return Err(PortError::RequestFailed);
        }

        Ok(extract_response_data(&text))
    }

    fn encode<B: Serialize>(body: &B) -> PortResult<Value> {
        serde_json::to_value(body).map_err(|e| {
            error!("Failed to encode request body: {}", e);
            PortError::RequestFailed
        })
    }
}

/// Turns a response body into JSON. An empty body becomes `{}`; a body that is
/// not JSON is kept as a JSON string.
fn extract_response_data(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Object(Default::default());
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn decode<T: DeserializeOwned>(value: Value) -> PortResult<T> {
    serde_json::from_value(value).map_err(|e| {
        error!("Unexpected response shape: {}", e);
        PortError::RequestFailed
    })
}

//=========================================================================================
// Wire Records
//=========================================================================================

#[derive(Deserialize)]
struct GenreRecord {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Description", default)]
    description: String,
}
impl GenreRecord {
    fn to_domain(self) -> Genre {
        Genre {
            name: self.name,
            description: self.description,
        }
    }
}

#[derive(Deserialize)]
struct DirectorRecord {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Bio", default)]
    bio: String,
    #[serde(rename = "Birth", default)]
    birth: Option<String>,
    #[serde(rename = "Death", default)]
    death: Option<String>,
}
impl DirectorRecord {
    fn to_domain(self) -> Director {
        Director {
            name: self.name,
            bio: self.bio,
            birth: self.birth,
            death: self.death,
        }
    }
}

#[derive(Deserialize)]
struct MovieRecord {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Genre")]
    genre: GenreRecord,
    #[serde(rename = "Director")]
    director: DirectorRecord,
    #[serde(rename = "ImagePath", default)]
    image_path: Option<String>,
    #[serde(rename = "Featured", default)]
    featured: bool,
}
impl MovieRecord {
    fn to_domain(self) -> Movie {
        Movie {
            id: self.id,
            title: self.title,
            description: self.description,
            genre: self.genre.to_domain(),
            director: self.director.to_domain(),
            image_path: self.image_path,
            featured: self.featured,
        }
    }
}

#[derive(Deserialize)]
struct UserRecord {
    #[serde(rename = "_id", default)]
    id: Option<String>,
    #[serde(rename = "Username", alias = "username")]
    username: String,
    #[serde(rename = "Email", alias = "email", default)]
    email: Option<String>,
    #[serde(rename = "Birthday", alias = "birthday", default)]
    birthday: Option<String>,
    #[serde(rename = "FavoriteMovies", default)]
    favorite_movies: Vec<String>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            birthday: self.birthday.as_deref().and_then(parse_birthday),
            favorite_movies: self.favorite_movies,
        }
    }
}

#[derive(Deserialize)]
struct AuthRecord {
    token: String,
    user: UserRecord,
}

/// The backend stores birthdays as full timestamps; only the date part matters.
fn parse_birthday(raw: &str) -> Option<NaiveDate> {
    let date = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

#[derive(Serialize)]
struct UserBody<'a> {
    #[serde(rename = "Username", skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(rename = "Password", skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(rename = "Email", skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(rename = "Birthday", skip_serializing_if = "Option::is_none")]
    birthday: Option<String>,
}

impl<'a> UserBody<'a> {
    fn from_new_user(details: &'a NewUser) -> Self {
        Self {
            username: Some(&details.username),
            password: Some(&details.password),
            email: details.email.as_deref(),
            birthday: details.birthday.map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }

    fn from_update(update: &'a ProfileUpdate) -> Self {
        Self {
            username: update.username.as_deref(),
            password: update.password.as_deref(),
            email: update.email.as_deref(),
            birthday: update.birthday.map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }

    fn from_credentials(credentials: &'a Credentials) -> Self {
        Self {
            username: Some(&credentials.username),
            password: Some(&credentials.password),
            email: None,
            birthday: None,
        }
    }
}

#[derive(Serialize)]
struct FavoriteBody<'a> {
    #[serde(rename = "FavoriteMovie")]
    favorite_movie: &'a str,
}

//=========================================================================================
// `MovieApi` Trait Implementation
//=========================================================================================

#[async_trait]
impl MovieApi for HttpMovieApi {
    async fn register(&self, details: &NewUser) -> PortResult<User> {
        let url = self.endpoint(&["users"])?;
        let body = Self::encode(&UserBody::from_new_user(details))?;
        let value = self.send(Method::POST, url, Auth::Public, Some(body)).await?;
        decode::<UserRecord>(value).map(UserRecord::to_domain)
    }

    async fn login(&self, credentials: &Credentials) -> PortResult<AuthResult> {
        let url = self.endpoint(&["login"])?;
        let body = Self::encode(&UserBody::from_credentials(credentials))?;
        let value = self.send(Method::POST, url, Auth::Public, Some(body)).await?;
        let record = decode::<AuthRecord>(value)?;
        Ok(AuthResult {
            token: record.token,
            user: record.user.to_domain(),
        })
    }

    async fn list_movies(&self) -> PortResult<Vec<Movie>> {
        let auth = self.bearer().await?;
        let url = self.endpoint(&["movies"])?;
        let value = self.send(Method::GET, url, auth, None).await?;
        let records = decode::<Vec<MovieRecord>>(value)?;
        Ok(records.into_iter().map(MovieRecord::to_domain).collect())
    }

    async fn get_movie(&self, title: &str) -> PortResult<Movie> {
        let auth = self.bearer().await?;
        let url = self.endpoint(&["movies", title])?;
        let value = self.send(Method::GET, url, auth, None).await?;
        decode::<MovieRecord>(value).map(MovieRecord::to_domain)
    }

    async fn get_director(&self, name: &str) -> PortResult<Director> {
        let auth = self.bearer().await?;
        let url = self.endpoint(&["movies", "director", name])?;
        let value = self.send(Method::GET, url, auth, None).await?;
        decode::<DirectorRecord>(value).map(DirectorRecord::to_domain)
    }

    async fn get_genre(&self, name: &str) -> PortResult<Genre> {
        let auth = self.bearer().await?;
        let url = self.endpoint(&["movies", "Genre", name])?;
        let value = self.send(Method::GET, url, auth, None).await?;
        decode::<GenreRecord>(value).map(GenreRecord::to_domain)
    }

    async fn get_user(&self) -> PortResult<User> {
        let (auth, username) = self.user_scope().await?;
        let url = self.endpoint(&[username.as_str()])?;
        let value = self.send(Method::GET, url, auth, None).await?;
        decode::<UserRecord>(value).map(UserRecord::to_domain)
    }

    async fn list_favorites(&self) -> PortResult<Vec<String>> {
        let (auth, username) = self.user_scope().await?;
        let url = self.endpoint(&["users", username.as_str(), "movies"])?;
        let value = self.send(Method::GET, url, auth, None).await?;
        decode(value)
    }

    async fn add_favorite(&self, movie_id: &str) -> PortResult<User> {
        let (auth, username) = self.user_scope().await?;
        let url = self.endpoint(&["users", username.as_str(), "movies", movie_id])?;
        let body = Self::encode(&FavoriteBody {
            favorite_movie: movie_id,
        })?;
        let value = self.send(Method::PUT, url, auth, Some(body)).await?;
        decode::<UserRecord>(value).map(UserRecord::to_domain)
    }

    async fn update_user(&self, update: &ProfileUpdate) -> PortResult<User> {
        let (auth, username) = self.user_scope().await?;
        let url = self.endpoint(&["users", username.as_str()])?;
        let body = Self::encode(&UserBody::from_update(update))?;
        let value = self.send(Method::PUT, url, auth, Some(body)).await?;
        decode::<UserRecord>(value).map(UserRecord::to_domain)
    }

    async fn delete_user(&self) -> PortResult<Confirmation> {
        let (auth, username) = self.user_scope().await?;
        let url = self.endpoint(&["users", username.as_str()])?;
        let value = self.send(Method::DELETE, url, auth, None).await?;
        // The backend answers with plain text, a JSON object, or nothing.
        let message = match value {
            Value::String(text) => Some(text),
            Value::Object(map) => map
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        };
        Ok(Confirmation { message })
    }

    async fn remove_favorite(&self, movie_id: &str) -> PortResult<User> {
        let (auth, username) = self.user_scope().await?;
        let url = self.endpoint(&["users", username.as_str(), "movies", movie_id])?;
        let value = self.send(Method::DELETE, url, auth, None).await?;
        decode::<UserRecord>(value).map(UserRecord::to_domain)
    }
}
