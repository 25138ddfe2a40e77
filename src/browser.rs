//! Session state for the movie browser.
//!
//! `MovieBrowser` is a plain state container: it never performs I/O. The
//! session loop asks it for the next [`PageRequest`], runs the request, and
//! hands the outcome back with [`MovieBrowser::complete_load`] or
//! [`MovieBrowser::fail_load`].

use crate::models::{DiscoverPage, Genre, Movie};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    AllMovies,
    Favorites,
}

impl Tab {
    pub fn label(&self) -> &'static str {
        match self {
            Tab::AllMovies => "ALL MOVIES",
            Tab::Favorites => "FAVOURITES",
        }
    }
}

/// A page fetch issued under a given filter generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub genre: Option<i32>,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct MovieBrowser {
    movies: Vec<Movie>,
    favorites: Vec<Movie>,
    genres: Vec<Genre>,
    search_term: String,
    selected_genre: Option<i32>,
    tab: Tab,
    page: u32,
    loading: bool,
    exhausted: bool,
    generation: u64,
}

impl Default for MovieBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl MovieBrowser {
    pub fn new() -> Self {
        Self {
            movies: Vec::new(),
            favorites: Vec::new(),
            genres: Vec::new(),
            search_term: String::new(),
            selected_genre: None,
            tab: Tab::AllMovies,
            page: 1,
            loading: false,
            exhausted: false,
            generation: 0,
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn favorites(&self) -> &[Movie] {
        &self.favorites
    }

    pub fn genres(&self) -> &[Genre] {
        &self.genres
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn selected_genre(&self) -> Option<i32> {
        self.selected_genre
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set_genres(&mut self, genres: Vec<Genre>) {
        self.genres = genres;
    }

    pub fn genre_name(&self, id: i32) -> Option<&str> {
        self.genres
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.name.as_str())
    }

    /// Whether a sentinel trigger should be passed on to the debouncer.
    pub fn accepts_scroll_trigger(&self) -> bool {
        !self.loading && !self.exhausted
    }

    /// Marks a request as in flight and returns it, unless one is already
    /// running or the catalog is exhausted for the current filter.
    pub fn begin_load(&mut self) -> Option<PageRequest> {
        if !self.accepts_scroll_trigger() {
            return None;
        }
        self.loading = true;
        Some(PageRequest {
            page: self.page,
            genre: self.selected_genre,
            generation: self.generation,
        })
    }

    /// Appends a fetched page. Returns `false` when the request belongs to an
    /// older filter generation, in which case nothing changes.
    pub fn complete_load(&mut self, request: PageRequest, data: DiscoverPage) -> bool {
        if request.generation != self.generation {
            return false;
        }
        self.exhausted = data.is_last();
        self.movies.extend(data.results);
        self.page += 1;
        self.loading = false;
        true
    }

    /// Clears the loading flag after a failed fetch. Stale failures are ignored.
    pub fn fail_load(&mut self, request: PageRequest) -> bool {
        if request.generation != self.generation {
            return false;
        }
        self.loading = false;
        true
    }

    /// Switches the genre filter and restarts pagination from page 1.
    ///
    /// Any request still in flight belongs to the previous generation, so its
    /// response will be dropped and the loading flag is released right away.
    pub fn select_genre(&mut self, genre: Option<i32>) {
        self.selected_genre = genre;
        self.movies.clear();
        self.page = 1;
        self.exhausted = false;
        self.loading = false;
        self.generation += 1;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn clear_search(&mut self) {
        self.search_term.clear();
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    /// Adds a favorite unless one with the same id is already present.
    pub fn add_favorite(&mut self, movie: Movie) -> bool {
        if self.is_favorite(movie.id) {
            return false;
        }
        self.favorites.push(movie);
        true
    }

    pub fn remove_favorite(&mut self, id: i32) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|m| m.id != id);
        self.favorites.len() != before
    }

    pub fn is_favorite(&self, id: i32) -> bool {
        self.favorites.iter().any(|m| m.id == id)
    }

    /// First loaded movie with the given id.
    pub fn find_movie(&self, id: i32) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == id)
    }

    /// Movies of the active tab whose title contains the search term.
    pub fn visible(&self) -> Vec<&Movie> {
        let base = match self.tab {
            Tab::AllMovies => &self.movies,
            Tab::Favorites => &self.favorites,
        };
        let needle = self.search_term.to_lowercase();
        base.iter()
            .filter(|m| title_matches(&m.title, &needle))
            .collect()
    }
}

fn title_matches(title: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || title.to_lowercase().contains(needle_lower)
}
