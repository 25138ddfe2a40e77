use crate::browser::{MovieBrowser, Tab};
use crate::tmdb::poster_url;
use std::fmt::Write;

pub fn render(browser: &MovieBrowser) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Movies App ===");
    if browser.search_term().is_empty() {
        let _ = writeln!(out, "Search: (none)");
    } else {
        let _ = writeln!(out, "Search: \"{}\"", browser.search_term());
    }
    let _ = writeln!(out, "Genre: {}", selected_genre_label(browser));
    let _ = writeln!(
        out,
        "{}  {}",
        tab_label(browser, Tab::AllMovies),
        tab_label(browser, Tab::Favorites)
    );
    let _ = writeln!(out);

    let visible = browser.visible();
    if visible.is_empty() {
        let _ = writeln!(out, "  (no movies)");
    }
    let action = match browser.tab() {
        Tab::AllMovies => "fav",
        Tab::Favorites => "unfav",
    };
    for movie in visible {
        let _ = writeln!(out, "  [{}] {}", movie.id, movie.title);
        if let Some(url) = poster_url(movie.poster_path.as_deref()) {
            let _ = writeln!(out, "      poster: {}", url);
        }
        let _ = writeln!(out, "      > {} {}", action, movie.id);
    }

    if browser.tab() == Tab::AllMovies {
        if browser.is_loading() {
            let _ = writeln!(out, "  ... loading");
        } else if browser.is_exhausted() {
            let _ = writeln!(out, "  -- end of catalog --");
        }
    }
    out
}

pub fn render_genres(browser: &MovieBrowser) -> String {
    let mut out = String::new();
    let marker = |selected: bool| if selected { "*" } else { " " };
    let _ = writeln!(
        out,
        "{} all  All Genres",
        marker(browser.selected_genre().is_none())
    );
    for genre in browser.genres() {
        let _ = writeln!(
            out,
            "{} {:<4} {}",
            marker(browser.selected_genre() == Some(genre.id)),
            genre.id,
            genre.name
        );
    }
    out
}

fn selected_genre_label(browser: &MovieBrowser) -> String {
    match browser.selected_genre() {
        None => "All Genres".to_string(),
        Some(id) => browser
            .genre_name(id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{id}")),
    }
}

fn tab_label(browser: &MovieBrowser, tab: Tab) -> String {
    if browser.tab() == tab {
        format!("[{}]", tab.label())
    } else {
        format!(" {} ", tab.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DiscoverPage, Genre, Movie};

    fn loaded() -> MovieBrowser {
        let mut b = MovieBrowser::new();
        b.set_genres(vec![
            Genre {
                id: 28,
                name: "Action".to_string(),
            },
            Genre {
                id: 35,
                name: "Comedy".to_string(),
            },
        ]);
        let req = b.begin_load().unwrap();
        b.complete_load(
            req,
            DiscoverPage {
                page: 1,
                total_pages: 2,
                results: vec![Movie {
                    id: 603,
                    title: "The Matrix".to_string(),
                    poster_path: Some("/m.jpg".to_string()),
                    genre_ids: vec![28],
                }],
            },
        );
        b
    }

    #[test]
    fn all_movies_cards_offer_add_action() {
        let frame = render(&loaded());
        assert!(frame.contains("[ALL MOVIES]"));
        assert!(frame.contains("[603] The Matrix"));
        assert!(frame.contains("poster: https://image.tmdb.org/t/p/w500/m.jpg"));
        assert!(frame.contains("> fav 603"));
        assert!(frame.contains("Genre: All Genres"));
    }

    #[test]
    fn favourites_tab_offers_remove_action() {
        let mut b = loaded();
        let movie = b.find_movie(603).cloned().unwrap();
        b.add_favorite(movie);
        b.switch_tab(Tab::Favorites);
        let frame = render(&b);
        assert!(frame.contains("[FAVOURITES]"));
        assert!(frame.contains("> unfav 603"));
    }

    #[test]
    fn genre_list_marks_selection() {
        let mut b = loaded();
        b.select_genre(Some(35));
        let list = render_genres(&b);
        assert!(list.contains("* 35   Comedy"));
        assert!(list.contains("  all  All Genres"));
        assert!(render(&b).contains("Genre: Comedy"));
    }
}
