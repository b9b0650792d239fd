//! services/client/src/bin/myflix.rs
//!
//! Command-line front end for the movie catalog. Each subcommand builds the
//! matching view and runs one of its actions; the login survives between runs
//! in the session file.

use chrono::NaiveDate;
use client_lib::{
    adapters::{FileSessionStore, HttpMovieApi, TerminalShell},
    config::Config,
    error::ClientError,
    views::{AppState, MovieCard, NavBar, ProfileView, UpdateProfileView, WelcomePage},
};
use myflix_core::domain::{Credentials, NewUser, ProfileUpdate};
use std::env;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [-y|--yes] <command> [args]\n\nCommands:\n  register <username> <password> [--email <e>] [--birthday <YYYY-MM-DD>]\n  login <username> <password>\n  logout\n  movies                     list the catalog, favorites marked with *\n  movie <title>              show a movie's synopsis\n  director <name>            show a director\n  genre <name>               show a genre\n  me                         show the current user\n  favorites                  list favorite movie ids\n  fav-add <movie-id>\n  fav-remove <movie-id>\n  update [--username <u>] [--password <p>] [--email <e>] [--birthday <YYYY-MM-DD>]\n  delete-account\n  help\n\nFlags:\n  -y, --yes                  answer yes to confirmations\n\nEnvironment:\n  MYFLIX_API_URL             API origin (default https://lee-movies.herokuapp.com/)\n  MYFLIX_SESSION_PATH        session file (default .myflix/session.json)\n  RUST_LOG                   log level (default INFO)"
    );
}

#[derive(Debug, PartialEq)]
enum Command {
    Register {
        username: String,
        password: String,
        email: Option<String>,
        birthday: Option<NaiveDate>,
    },
    Login {
        username: String,
        password: String,
    },
    Logout,
    Movies,
    Movie(String),
    Director(String),
    Genre(String),
    Me,
    Favorites,
    FavAdd(String),
    FavRemove(String),
    Update(ProfileUpdate),
    DeleteAccount,
    Help,
}

fn usage(message: impl Into<String>) -> ClientError {
    ClientError::Usage(message.into())
}

fn parse_date(raw: &str) -> Result<NaiveDate, ClientError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| usage(format!("'{}' is not a YYYY-MM-DD date", raw)))
}

/// Splits `--name value` pairs off the tail of a command line.
fn parse_flags(args: &[String], allowed: &[&str]) -> Result<Vec<(String, String)>, ClientError> {
    let mut flags = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let name = arg
            .strip_prefix("--")
            .filter(|n| allowed.contains(n))
            .ok_or_else(|| usage(format!("unexpected argument '{}'", arg)))?;
        let value = iter
            .next()
            .ok_or_else(|| usage(format!("--{} needs a value", name)))?;
        flags.push((name.to_string(), value.clone()));
    }
    Ok(flags)
}

fn one_arg(args: &[String], what: &str) -> Result<String, ClientError> {
    match args {
        [value] => Ok(value.clone()),
        _ => Err(usage(format!("expected exactly one {}", what))),
    }
}

/// Joins the remaining words, so titles and names need no quoting.
fn rest_arg(args: &[String], what: &str) -> Result<String, ClientError> {
    if args.is_empty() {
        return Err(usage(format!("missing {}", what)));
    }
    Ok(args.join(" "))
}

fn no_args(args: &[String], command: Command) -> Result<Command, ClientError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(usage(format!("unexpected argument '{}'", args[0])))
    }
}

fn parse_command(args: &[String]) -> Result<Command, ClientError> {
    let (name, rest) = args.split_first().ok_or_else(|| usage("missing command"))?;
    match name.as_str() {
        "register" => {
            if rest.len() < 2 {
                return Err(usage("register needs <username> <password>"));
            }
            let mut email = None;
            let mut birthday = None;
            for (flag, value) in parse_flags(&rest[2..], &["email", "birthday"])? {
                match flag.as_str() {
                    "email" => email = Some(value),
                    _ => birthday = Some(parse_date(&value)?),
                }
            }
            Ok(Command::Register {
                username: rest[0].clone(),
                password: rest[1].clone(),
                email,
                birthday,
            })
        }
        "login" => match rest {
            [username, password] => Ok(Command::Login {
                username: username.clone(),
                password: password.clone(),
            }),
            _ => Err(usage("login needs <username> <password>")),
        },
        "logout" => no_args(rest, Command::Logout),
        "movies" => no_args(rest, Command::Movies),
        "movie" => Ok(Command::Movie(rest_arg(rest, "title")?)),
        "director" => Ok(Command::Director(rest_arg(rest, "director name")?)),
        "genre" => Ok(Command::Genre(rest_arg(rest, "genre name")?)),
        "me" => no_args(rest, Command::Me),
        "favorites" => no_args(rest, Command::Favorites),
        "fav-add" => Ok(Command::FavAdd(one_arg(rest, "movie id")?)),
        "fav-remove" => Ok(Command::FavRemove(one_arg(rest, "movie id")?)),
        "update" => {
            let mut update = ProfileUpdate::default();
            for (flag, value) in
                parse_flags(rest, &["username", "password", "email", "birthday"])?
            {
                match flag.as_str() {
                    "username" => update.username = Some(value),
                    "password" => update.password = Some(value),
                    "email" => update.email = Some(value),
                    _ => update.birthday = Some(parse_date(&value)?),
                }
            }
            if update.is_empty() {
                return Err(usage("update needs at least one field"));
            }
            Ok(Command::Update(update))
        }
        "delete-account" => no_args(rest, Command::DeleteAccount),
        "help" | "-h" | "--help" => Ok(Command::Help),
        other => Err(usage(format!("unknown command '{}'", other))),
    }
}

async fn run(command: Command, state: AppState) -> Result<(), ClientError> {
    match command {
        Command::Register {
            username,
            password,
            email,
            birthday,
        } => {
            let page = WelcomePage::new(state);
            page.open_user_registration_dialog();
            let user = page
                .register(&NewUser {
                    username,
                    password,
                    email,
                    birthday,
                })
                .await?;
            println!("Created user {}", user.username);
        }
        Command::Login { username, password } => {
            let page = WelcomePage::new(state);
            page.open_user_login_dialog();
            let auth = page.login(&Credentials { username, password }).await?;
            println!("Logged in as {}", auth.user.username);
        }
        Command::Logout => NavBar::new(state).log_out().await?,
        Command::Movies => {
            let mut card = MovieCard::new(state);
            card.init().await?;
            for movie in &card.movies {
                let mark = if card.is_fav(&movie.id) { "*" } else { " " };
                println!(
                    "{} {}  {}  ({}, {})",
                    mark, movie.id, movie.title, movie.genre.name, movie.director.name
                );
            }
        }
        Command::Movie(title) => {
            MovieCard::new(state).show_movie(&title).await?;
        }
        Command::Director(name) => {
            MovieCard::new(state).show_director(&name).await?;
        }
        Command::Genre(name) => {
            MovieCard::new(state).show_genre(&name).await?;
        }
        Command::Me => {
            let mut profile = ProfileView::new(state);
            let user = profile.get_user().await?;
            println!("Username:  {}", user.username);
            println!("Email:     {}", user.email.as_deref().unwrap_or("-"));
            match user.birthday {
                Some(day) => println!("Birthday:  {}", day),
                None => println!("Birthday:  -"),
            }
            println!("Favorites: {}", user.favorite_movies.join(", "));
        }
        Command::Favorites => {
            let mut card = MovieCard::new(state);
            for id in card.get_favorite_movies().await? {
                println!("{}", id);
            }
        }
        Command::FavAdd(id) => {
            let mut card = MovieCard::new(state);
            card.add_to_favorite_movies(&id).await?;
            println!("Added {} ({} favorites)", id, card.favorite_movies.len());
        }
        Command::FavRemove(id) => {
            let mut card = MovieCard::new(state);
            card.remove_from_favorite_movies(&id).await?;
            println!("Removed {} ({} favorites)", id, card.favorite_movies.len());
        }
        Command::Update(update) => {
            ProfileView::new(state.clone()).open_update_profile_dialog();
            let editor = UpdateProfileView::new(state, update);
            let user = editor.update_user().await?;
            println!("Profile of {} updated", user.username);
        }
        Command::DeleteAccount => {
            let mut profile = ProfileView::new(state);
            if !profile.delete_profile().await? {
                println!("Cancelled");
            }
        }
        Command::Help => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // --- 2. Parse the Command Line ---
    let mut args: Vec<String> = env::args().collect();
    let program = if args.is_empty() {
        "myflix".to_string()
    } else {
        args.remove(0)
    };
    let assume_yes = args.iter().any(|a| a == "-y" || a == "--yes");
    args.retain(|a| a != "-y" && a != "--yes");

    let command = match parse_command(&args) {
        Ok(Command::Help) => {
            print_usage(&program);
            return Ok(());
        }
        Ok(command) => command,
        Err(e) => {
            print_usage(&program);
            return Err(e);
        }
    };

    // --- 3. Initialize Adapters ---
    let session = Arc::new(FileSessionStore::new(&config.session_path));
    let http = reqwest::Client::builder().build()?;
    let api = Arc::new(HttpMovieApi::new(http, config.api_url.clone(), session.clone()));
    info!(api = %api.base_url(), session = %session.path().display(), "Client ready.");
    let shell = Arc::new(TerminalShell::new(assume_yes));

    // --- 4. Run the Command ---
    run(command, AppState::new(api, session, shell)).await
}
