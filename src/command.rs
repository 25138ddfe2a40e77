use crate::browser::Tab;
use anyhow::{anyhow, bail, Result};
use std::str::FromStr;

pub const HELP: &str = "\
Commands:
  search <term> | /<term>   filter the current tab by title
  clear                     clear the search term
  genre <id> | genre all    filter movies by genre
  genres                    list available genres
  tab all | tab fav         switch between all movies and favourites
  fav <movie id>            add a loaded movie to favourites
  unfav <movie id>          remove a movie from favourites
  more | <enter>            load the next page
  help                      show this help
  quit                      leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    ClearSearch,
    SelectGenre(Option<i32>),
    ListGenres,
    SwitchTab(Tab),
    AddFavorite(i32),
    RemoveFavorite(i32),
    More,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let line = s.trim();
        if line.is_empty() {
            return Ok(Command::More);
        }
        if let Some(term) = line.strip_prefix('/') {
            return Ok(Command::Search(term.trim().to_string()));
        }
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((h, r)) => (h, r.trim()),
            None => (line, ""),
        };
        match head.to_lowercase().as_str() {
            "search" | "s" => Ok(Command::Search(rest.to_string())),
            "clear" => Ok(Command::ClearSearch),
            "genre" | "g" => parse_genre(rest),
            "genres" => Ok(Command::ListGenres),
            "tab" | "t" => parse_tab(rest).map(Command::SwitchTab),
            "fav" | "f" => parse_id(rest).map(Command::AddFavorite),
            "unfav" | "u" => parse_id(rest).map(Command::RemoveFavorite),
            "more" | "m" => Ok(Command::More),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(anyhow!("unknown command '{}' (try 'help')", other)),
        }
    }
}

fn parse_genre(arg: &str) -> Result<Command> {
    if arg.is_empty() || arg.eq_ignore_ascii_case("all") {
        return Ok(Command::SelectGenre(None));
    }
    parse_id(arg).map(|id| Command::SelectGenre(Some(id)))
}

fn parse_tab(arg: &str) -> Result<Tab> {
    match arg.to_lowercase().as_str() {
        "all" | "movies" | "allmovies" => Ok(Tab::AllMovies),
        "fav" | "favs" | "favorites" | "favourites" => Ok(Tab::Favorites),
        _ => bail!("tab must be 'all' or 'fav'"),
    }
}

fn parse_id(arg: &str) -> Result<i32> {
    if arg.is_empty() {
        bail!("missing id");
    }
    arg.parse::<i32>()
        .map_err(|_| anyhow!("'{}' is not a valid id", arg))
}
