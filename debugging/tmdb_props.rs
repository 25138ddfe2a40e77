//! Fetch the TMDB genre list and one discover page and print them as the browser sees them.
//! Usage:
//!   cargo run --bin tmdb_props -- [page] [genre_id]
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use cinebrowse::tmdb::{poster_url, TmdbApi, TmdbClient};
use dotenvy::dotenv;
use serde_json::{json, Value};
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let mut args = env::args().skip(1);
    let page: u32 = match args.next() {
        Some(raw) => raw.parse().context("page must be a positive integer")?,
        None => 1,
    };
    let genre: Option<i32> = match args.next() {
        Some(raw) => Some(raw.parse().context("genre_id must be an integer")?),
        None => None,
    };

    let client = TmdbClient::from_env()?;
    let (genres, discover) =
        tokio::try_join!(client.fetch_genres(), client.discover_movies(page, genre))?;

    let movies: Vec<Value> = discover
        .results
        .iter()
        .map(|m| {
            json!({
                "id": m.id,
                "title": m.title,
                "poster": poster_url(m.poster_path.as_deref()),
                "genre_ids": m.genre_ids,
            })
        })
        .collect();

    let out = json!({
        "genres": genres,
        "page": discover.page,
        "total_pages": discover.total_pages,
        "last_page": discover.is_last(),
        "movies": movies,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
