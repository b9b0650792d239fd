//! services/client/src/views/movie_card.rs
//!
//! The catalog view: every movie, which of them the user has favorited, and
//! the genre, director and synopsis dialogs.

use crate::views::{scope::ViewScope, state::AppState};
use myflix_core::domain::{Dialog, Director, Genre, Movie, User};
use myflix_core::ports::PortResult;
use tracing::{info, warn};

pub struct MovieCard {
    state: AppState,
    scope: ViewScope,
    pub movies: Vec<Movie>,
    pub favorite_movies: Vec<String>,
}

impl MovieCard {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            scope: ViewScope::new(),
            movies: Vec::new(),
            favorite_movies: Vec::new(),
        }
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Loads the catalog and the user's favorites.
    pub async fn init(&mut self) -> PortResult<()> {
        self.get_movies().await?;
        self.get_favorite_movies().await?;
        Ok(())
    }

    pub async fn get_movies(&mut self) -> PortResult<&[Movie]> {
        let movies = self.scope.run(self.state.api.list_movies()).await?;
        info!(count = movies.len(), "Movies loaded.");
        self.movies = movies;
        Ok(self.movies.as_slice())
    }

    pub async fn get_favorite_movies(&mut self) -> PortResult<&[String]> {
        let favorites = self.scope.run(self.state.api.list_favorites()).await?;
        info!(count = favorites.len(), "Favorite movies loaded.");
        self.favorite_movies = favorites;
        Ok(self.favorite_movies.as_slice())
    }

    pub fn is_fav(&self, id: &str) -> bool {
        self.favorite_movies.iter().any(|f| f == id)
    }

    pub fn open_genre_dialog(&self, name: &str, description: &str) {
        self.state.shell.open_dialog(Dialog::Genre {
            name: name.to_string(),
            description: description.to_string(),
        });
    }

    pub fn open_director_dialog(&self, name: &str, bio: &str, birthday: Option<&str>) {
        self.state.shell.open_dialog(Dialog::Director {
            name: name.to_string(),
            bio: bio.to_string(),
            birth: birthday.map(str::to_string),
        });
    }

    pub fn open_synopsis_dialog(&self, title: &str, description: &str) {
        self.state.shell.open_dialog(Dialog::Synopsis {
            title: title.to_string(),
            description: description.to_string(),
        });
    }

    /// Fetches a single movie by title and shows its synopsis.
    pub async fn show_movie(&self, title: &str) -> PortResult<Movie> {
        let movie = self.scope.run(self.state.api.get_movie(title)).await?;
        self.open_synopsis_dialog(&movie.title, &movie.description);
        Ok(movie)
    }

    pub async fn show_director(&self, name: &str) -> PortResult<Director> {
        let director = self.scope.run(self.state.api.get_director(name)).await?;
        self.open_director_dialog(&director.name, &director.bio, director.birth.as_deref());
        Ok(director)
    }

    pub async fn show_genre(&self, name: &str) -> PortResult<Genre> {
        let genre = self.scope.run(self.state.api.get_genre(name)).await?;
        self.open_genre_dialog(&genre.name, &genre.description);
        Ok(genre)
    }

    /// Adds a favorite, then reloads the view.
    pub async fn add_to_favorite_movies(&mut self, id: &str) -> PortResult<User> {
        let user = self.scope.run(self.state.api.add_favorite(id)).await?;
        info!(movie_id = id, "Added to favorites.");
        self.reload().await;
        Ok(user)
    }

    /// Removes a favorite, then reloads the view.
    pub async fn remove_from_favorite_movies(&mut self, id: &str) -> PortResult<User> {
        let user = self.scope.run(self.state.api.remove_favorite(id)).await?;
        info!(movie_id = id, "Removed from favorites.");
        self.reload().await;
        Ok(user)
    }

    /// A failed reload keeps the previous lists; the change itself already went through.
    async fn reload(&mut self) {
        if let Err(e) = self.init().await {
            warn!("Reload after favorite change failed: {}", e);
        }
    }
}
