//! Exercises `HttpMovieApi` and the views against an in-process mock of the
//! movie backend. The mock records every request so the wire contract can be
//! checked verb by verb and path by path.

use axum::{
    body::Bytes,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use client_lib::adapters::{HttpMovieApi, MemorySessionStore};
use client_lib::views::{AppState, NavBar, UpdateProfileView, WelcomePage};
use myflix_core::domain::{Credentials, Dialog, NewUser, ProfileUpdate, Route, Session};
use myflix_core::ports::{MovieApi, PortError, SessionStore, UiShell};
use reqwest::Url;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

//=========================================================================================
// Mock Backend
//=========================================================================================

#[derive(Debug, Clone, PartialEq)]
struct Recorded {
    method: Method,
    path: String,
    auth: Option<String>,
    body: Option<Value>,
}

#[derive(Default)]
struct Backend {
    users: HashMap<String, (String, Value)>,
    tokens: HashMap<String, String>,
    next_id: u32,
    requests: Vec<Recorded>,
}

type Shared = Arc<Mutex<Backend>>;

fn movies() -> Value {
    json!([
        {
            "_id": "m1",
            "Title": "Blade Runner",
            "Description": "A blade runner must pursue replicants.",
            "Genre": { "Name": "Science Fiction", "Description": "Speculative futures." },
            "Director": { "Name": "Ridley Scott", "Bio": "English filmmaker.", "Birth": "1937" },
            "ImagePath": "bladerunner.png",
            "Featured": true
        },
        {
            "_id": "m2",
            "Title": "Heat",
            "Description": "A group of professional bank robbers.",
            "Genre": { "Name": "Crime", "Description": "Criminal acts." },
            "Director": { "Name": "Michael Mann", "Bio": "American director.", "Birth": "1943" },
            "Featured": false
        }
    ])
}

fn percent_decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

fn text(status: StatusCode, body: &str) -> Response {
    (status, body.to_string()).into_response()
}

impl Backend {
    fn user_json(&self, username: &str) -> Option<Value> {
        self.users.get(username).map(|(_, user)| user.clone())
    }

    fn authenticated(&self, headers: &HeaderMap) -> Option<String> {
        let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
        let token = header.strip_prefix("Bearer ")?;
        self.tokens.get(token).cloned()
    }

    fn find_movie(&self, pred: impl Fn(&Value) -> bool) -> Option<Value> {
        movies().as_array()?.iter().find(|&m| pred(m)).cloned()
    }

    fn dispatch(&mut self, method: Method, segments: &[String], headers: &HeaderMap, body: Option<Value>) -> Response {
        let seg: Vec<&str> = segments.iter().map(String::as_str).collect();

        // --- Public ---
        match (&method, seg.as_slice()) {
            (&Method::POST, ["users"]) => {
                let body = body.unwrap_or_default();
                let username = body["Username"].as_str().unwrap_or_default().to_string();
                let password = body["Password"].as_str().unwrap_or_default().to_string();
                if username.is_empty() || self.users.contains_key(&username) {
                    return text(StatusCode::UNPROCESSABLE_ENTITY, "Username is taken or missing");
                }
                self.next_id += 1;
                let user = json!({
                    "_id": format!("u{}", self.next_id),
                    "Username": username,
                    "Email": body.get("Email").cloned().unwrap_or(Value::Null),
                    "Birthday": body.get("Birthday").cloned().unwrap_or(Value::Null),
                    "FavoriteMovies": []
                });
                self.users.insert(username, (password, user.clone()));
                return (StatusCode::CREATED, Json(user)).into_response();
            }
            (&Method::POST, ["login"]) => {
                let body = body.unwrap_or_default();
                let username = body["Username"].as_str().unwrap_or_default();
                let password = body["Password"].as_str().unwrap_or_default();
                return match self.users.get(username) {
                    Some((stored, user)) if stored == password => {
                        let token = format!("token-{}-{}", username, self.tokens.len() + 1);
                        let user = user.clone();
                        self.tokens.insert(token.clone(), username.to_string());
                        Json(json!({ "user": user, "token": token })).into_response()
                    }
                    _ => text(StatusCode::BAD_REQUEST, "Incorrect username or password"),
                };
            }
            _ => {}
        }

        // --- Authenticated ---
        let Some(caller) = self.authenticated(headers) else {
            return text(StatusCode::UNAUTHORIZED, "Unauthorized");
        };

        let found = |v: Option<Value>| match v {
            Some(v) => Json(v).into_response(),
            None => text(StatusCode::NOT_FOUND, "Not found"),
        };

        match (&method, seg.as_slice()) {
            (&Method::GET, ["movies"]) => Json(movies()).into_response(),
            (&Method::GET, ["movies", "director", name]) => found(
                self.find_movie(|m| m["Director"]["Name"] == *name)
                    .map(|m| m["Director"].clone()),
            ),
            (&Method::GET, ["movies", "Genre", name]) => found(
                self.find_movie(|m| m["Genre"]["Name"] == *name)
                    .map(|m| m["Genre"].clone()),
            ),
            (&Method::GET, ["movies", title]) => found(self.find_movie(|m| m["Title"] == *title)),
            (&Method::GET, ["users", user, "movies"]) => {
                found(self.user_json(user).map(|u| u["FavoriteMovies"].clone()))
            }
            (&Method::PUT, ["users", user, "movies", id]) => {
                let Some((_, record)) = self.users.get_mut(*user) else {
                    return text(StatusCode::NOT_FOUND, "Not found");
                };
                let favorites = record["FavoriteMovies"].as_array_mut().expect("array");
                if !favorites.iter().any(|f| f == *id) {
                    favorites.push(json!(id));
                }
                Json(record.clone()).into_response()
            }
            (&Method::DELETE, ["users", user, "movies", id]) => {
                let Some((_, record)) = self.users.get_mut(*user) else {
                    return text(StatusCode::NOT_FOUND, "Not found");
                };
                let favorites = record["FavoriteMovies"].as_array_mut().expect("array");
                favorites.retain(|f| f != *id);
                Json(record.clone()).into_response()
            }
            (&Method::PUT, ["users", user]) => {
                let Some((mut password, mut record)) = self.users.remove(*user) else {
                    return text(StatusCode::NOT_FOUND, "Not found");
                };
                let body = body.unwrap_or_default();
                for field in ["Email", "Birthday"] {
                    if let Some(v) = body.get(field) {
                        record[field] = v.clone();
                    }
                }
                if let Some(p) = body.get("Password").and_then(Value::as_str) {
                    password = p.to_string();
                }
                let new_name = body
                    .get("Username")
                    .and_then(Value::as_str)
                    .unwrap_or(*user)
                    .to_string();
                record["Username"] = json!(new_name);
                for owner in self.tokens.values_mut() {
                    if owner.as_str() == *user {
                        *owner = new_name.clone();
                    }
                }
                self.users.insert(new_name, (password, record.clone()));
                Json(record).into_response()
            }
            (&Method::DELETE, ["users", user]) => match self.users.remove(*user) {
                Some(_) => text(StatusCode::OK, &format!("{} was deleted.", user)),
                None => text(StatusCode::NOT_FOUND, &format!("{} was not found", user)),
            },
            (&Method::GET, [user]) if *user == caller => found(self.user_json(user)),
            _ => text(StatusCode::NOT_FOUND, "Not found"),
        }
    }
}

async fn handle(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body: Option<Value> = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };
    let segments: Vec<String> = uri
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .map(percent_decode)
        .collect();

    let mut backend = state.lock().unwrap();
    backend.requests.push(Recorded {
        method: method.clone(),
        path: uri.path().to_string(),
        auth: headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.clone(),
    });
    backend.dispatch(method, &segments, &headers, body)
}

struct MockServer {
    base: Url,
    state: Shared,
    handle: JoinHandle<()>,
}

impl MockServer {
    async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(Backend::default()));
        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base: Url::parse(&format!("http://{}/", addr)).unwrap(),
            state,
            handle,
        }
    }

    fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    fn client(&self, session: Arc<dyn SessionStore>) -> HttpMovieApi {
        HttpMovieApi::new(reqwest::Client::new(), self.base.clone(), session)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

//=========================================================================================
// Helpers
//=========================================================================================

#[derive(Default)]
struct QuietShell {
    routes: Mutex<Vec<Route>>,
}

impl UiShell for QuietShell {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
    fn open_dialog(&self, _dialog: Dialog) {}
    fn notify(&self, _message: &str, _action: &str, _duration: Duration) {}
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

fn new_user(username: &str, password: &str) -> NewUser {
    NewUser {
        username: username.into(),
        password: password.into(),
        email: None,
        birthday: None,
    }
}

fn credentials(username: &str, password: &str) -> Credentials {
    Credentials {
        username: username.into(),
        password: password.into(),
    }
}

/// Registers `alice` and logs her in, returning the store holding her session.
async fn logged_in_alice(server: &MockServer) -> (Arc<MemorySessionStore>, HttpMovieApi) {
    let session = Arc::new(MemorySessionStore::default());
    let api = server.client(session.clone());
    api.register(&new_user("alice", "x")).await.unwrap();
    let auth = api.login(&credentials("alice", "x")).await.unwrap();
    session.set(&auth.token, &auth.user.username).await.unwrap();
    (session, api)
}

//=========================================================================================
// Wire Contract
//=========================================================================================

#[test]
fn mock_decodes_escaped_segments() {
    assert_eq!(percent_decode("Heat%20"), "Heat ");
    assert_eq!(percent_decode("a%2Fb"), "a/b");
    assert_eq!(percent_decode("caf%C3%A9"), "café");
    assert_eq!(percent_decode("%é"), "%é");
}

#[tokio::test]
async fn every_operation_matches_its_verb_path_and_body() {
    let server = MockServer::start().await;
    let (session, api) = logged_in_alice(&server).await;
    let token = session.get().await.unwrap().token.unwrap();
    let bearer = Some(format!("Bearer {}", token));

    api.list_movies().await.unwrap();
    api.get_movie("Blade Runner").await.unwrap();
    api.get_director("Ridley Scott").await.unwrap();
    api.get_genre("Science Fiction").await.unwrap();
    api.get_user().await.unwrap();
    api.list_favorites().await.unwrap();
    api.add_favorite("m2").await.unwrap();
    api.remove_favorite("m2").await.unwrap();
    api.update_user(&ProfileUpdate {
        email: Some("alice@example.com".into()),
        ..Default::default()
    })
    .await
    .unwrap();
    api.delete_user().await.unwrap();

    let expected = vec![
        (Method::POST, "/users", None, Some(json!({ "Username": "alice", "Password": "x" }))),
        (Method::POST, "/login", None, Some(json!({ "Username": "alice", "Password": "x" }))),
        (Method::GET, "/movies", bearer.clone(), None),
        (Method::GET, "/movies/Blade%20Runner", bearer.clone(), None),
        (Method::GET, "/movies/director/Ridley%20Scott", bearer.clone(), None),
        (Method::GET, "/movies/Genre/Science%20Fiction", bearer.clone(), None),
        (Method::GET, "/alice", bearer.clone(), None),
        (Method::GET, "/users/alice/movies", bearer.clone(), None),
        (
            Method::PUT,
            "/users/alice/movies/m2",
            bearer.clone(),
            Some(json!({ "FavoriteMovie": "m2" })),
        ),
        (Method::DELETE, "/users/alice/movies/m2", bearer.clone(), None),
        (
            Method::PUT,
            "/users/alice",
            bearer.clone(),
            Some(json!({ "Email": "alice@example.com" })),
        ),
        (Method::DELETE, "/users/alice", bearer.clone(), None),
    ];
    let expected: Vec<Recorded> = expected
        .into_iter()
        .map(|(method, path, auth, body)| Recorded {
            method,
            path: path.to_string(),
            auth,
            body,
        })
        .collect();

    assert_eq!(server.requests(), expected);
}

#[tokio::test]
async fn responses_map_onto_domain_records() {
    let server = MockServer::start().await;
    let (_session, api) = logged_in_alice(&server).await;

    let movies = api.list_movies().await.unwrap();
    assert_eq!(movies.len(), 2);
    assert_eq!(movies[0].title, "Blade Runner");
    assert_eq!(movies[0].genre.name, "Science Fiction");
    assert!(movies[0].featured);
    assert_eq!(movies[1].image_path, None);

    let director = api.get_director("Michael Mann").await.unwrap();
    assert_eq!(director.birth.as_deref(), Some("1943"));

    let genre = api.get_genre("Crime").await.unwrap();
    assert_eq!(genre.description, "Criminal acts.");

    let confirmation = api.delete_user().await.unwrap();
    assert_eq!(confirmation.message.as_deref(), Some("alice was deleted."));
}

//=========================================================================================
// Scenarios
//=========================================================================================

#[tokio::test]
async fn register_returns_the_created_user() {
    let server = MockServer::start().await;
    let api = server.client(Arc::new(MemorySessionStore::default()));

    let user = api.register(&new_user("alice", "x")).await.unwrap();
    assert_eq!(user.username, "alice");
    assert!(user.favorite_movies.is_empty());
}

#[tokio::test]
async fn duplicate_registration_is_normalized() {
    let server = MockServer::start().await;
    let api = server.client(Arc::new(MemorySessionStore::default()));
    api.register(&new_user("alice", "x")).await.unwrap();

    let err = api.register(&new_user("alice", "y")).await.unwrap_err();
    assert!(matches!(err, PortError::RequestFailed));
    assert_eq!(err.to_string(), "Something bad happened; please try again later.");
}

#[tokio::test]
async fn list_favorites_is_idempotent() {
    let server = MockServer::start().await;
    let (_session, api) = logged_in_alice(&server).await;
    api.add_favorite("m1").await.unwrap();

    let first = api.list_favorites().await.unwrap();
    let second = api.list_favorites().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first, vec!["m1"]);
}

#[tokio::test]
async fn add_then_remove_favorite_round_trip() {
    let server = MockServer::start().await;
    let (_session, api) = logged_in_alice(&server).await;

    let user = api.add_favorite("m2").await.unwrap();
    assert_eq!(user.favorite_movies, vec!["m2"]);
    assert!(api.list_favorites().await.unwrap().contains(&"m2".to_string()));

    api.remove_favorite("m2").await.unwrap();
    assert!(!api.list_favorites().await.unwrap().contains(&"m2".to_string()));
}

#[tokio::test]
async fn invalid_login_is_normalized_and_keeps_session() {
    let server = MockServer::start().await;
    let session = Arc::new(MemorySessionStore::default());
    let api = Arc::new(server.client(session.clone()));
    api.register(&new_user("alice", "x")).await.unwrap();

    let shell = Arc::new(QuietShell::default());
    let page = WelcomePage::new(AppState::new(api, session.clone(), shell.clone()));

    let result = page.login(&credentials("alice", "wrong")).await;
    assert!(matches!(result, Err(PortError::RequestFailed)));
    assert_eq!(session.get().await.unwrap(), Session::default());
    assert!(shell.routes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn logout_never_reuses_the_old_token() {
    let server = MockServer::start().await;
    let session = Arc::new(MemorySessionStore::default());
    let api = Arc::new(server.client(session.clone()));
    api.register(&new_user("alice", "x")).await.unwrap();

    let state = AppState::new(api.clone(), session.clone(), Arc::new(QuietShell::default()));
    let auth = WelcomePage::new(state.clone())
        .login(&credentials("alice", "x"))
        .await
        .unwrap();
    let token_a = format!("Bearer {}", auth.token);
    assert_eq!(session.get().await.unwrap().token.as_deref(), Some(auth.token.as_str()));

    NavBar::new(state).log_out().await.unwrap();
    let before = server.requests().len();

    assert!(matches!(api.list_movies().await, Err(PortError::NotLoggedIn)));
    let requests = server.requests();
    assert_eq!(requests.len(), before);
    assert!(requests[before..]
        .iter()
        .all(|r| r.auth.as_deref() != Some(token_a.as_str())));
}

#[tokio::test]
async fn rename_then_get_user_reflects_new_name() {
    let server = MockServer::start().await;
    let (session, api) = logged_in_alice(&server).await;
    let api = Arc::new(api);
    let state = AppState::new(api.clone(), session.clone(), Arc::new(QuietShell::default()));

    let editor = UpdateProfileView::new(
        state,
        ProfileUpdate {
            username: Some("alice2".into()),
            ..Default::default()
        },
    );
    editor.update_user().await.unwrap();

    assert_eq!(session.get().await.unwrap().username.as_deref(), Some("alice2"));
    let user = api.get_user().await.unwrap();
    assert_eq!(user.username, "alice2");
    assert_eq!(server.requests().last().unwrap().path, "/alice2");
}

//=========================================================================================
// Failures
//=========================================================================================

#[tokio::test]
async fn unknown_title_is_normalized() {
    let server = MockServer::start().await;
    let (_session, api) = logged_in_alice(&server).await;
    assert!(matches!(
        api.get_movie("Nope").await,
        Err(PortError::RequestFailed)
    ));
}

#[tokio::test]
async fn dot_parameters_never_reach_another_endpoint() {
    let server = MockServer::start().await;
    let (_session, api) = logged_in_alice(&server).await;
    let before = server.requests().len();

    assert!(matches!(api.remove_favorite("..").await, Err(PortError::RequestFailed)));
    assert!(matches!(api.get_movie(".").await, Err(PortError::RequestFailed)));

    let dotted = Arc::new(MemorySessionStore::with_session(Session::new("tok", "..")));
    let api = server.client(dotted);
    assert!(matches!(api.delete_user().await, Err(PortError::RequestFailed)));

    assert_eq!(server.requests().len(), before);
}

#[tokio::test]
async fn stale_token_is_normalized() {
    let server = MockServer::start().await;
    let session = Arc::new(MemorySessionStore::with_session(Session::new("bogus", "alice")));
    let api = server.client(session);

    assert!(matches!(api.list_movies().await, Err(PortError::RequestFailed)));
    assert_eq!(
        server.requests()[0].auth.as_deref(),
        Some("Bearer bogus")
    );
}

#[tokio::test]
async fn transport_failure_is_normalized() {
    // Reserve a port, then free it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let session = Arc::new(MemorySessionStore::default());
    let api = HttpMovieApi::new(
        reqwest::Client::new(),
        Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap(),
        session,
    );
    assert!(matches!(
        api.login(&credentials("alice", "x")).await,
        Err(PortError::RequestFailed)
    ));
}
