use crate::config::Settings;
use crate::models::{DiscoverPage, Genre, GenreList};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    api_base: String,
}

#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn fetch_genres(&self) -> Result<Vec<Genre>>;
    async fn discover_movies(&self, page: u32, genre: Option<i32>) -> Result<DiscoverPage>;
}

impl TmdbClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let user_agent = format!("cinebrowse/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(settings.http_timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            api_base: settings.api_base.clone(),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(&Settings::from_env()?)
    }

    fn genres_url(&self) -> String {
        format!(
            "{}/genre/movie/list?api_key={}",
            self.api_base,
            urlencoding::encode(&self.api_key)
        )
    }

    fn discover_url(&self, page: u32, genre: Option<i32>) -> String {
        let mut url = format!(
            "{}/discover/movie?api_key={}&page={page}",
            self.api_base,
            urlencoding::encode(&self.api_key)
        );
        if let Some(id) = genre {
            url.push_str(&format!("&with_genres={id}"));
        }
        url
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("request to {} failed", redact_key(url)))?;
        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(|e| e.without_url())
            .with_context(|| format!("reading body from {} failed", redact_key(url)))?;
        if !status.is_success() {
            return Err(anyhow!("{} -> {}", redact_key(url), text));
        }
        let parsed: T = serde_json::from_str(&text).context("JSON parse failed")?;
        Ok(parsed)
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn fetch_genres(&self) -> Result<Vec<Genre>> {
        let data: GenreList = self.get_json(&self.genres_url()).await?;
        debug!(count = data.genres.len(), "Fetched TMDB genres");
        Ok(data.genres)
    }

    async fn discover_movies(&self, page: u32, genre: Option<i32>) -> Result<DiscoverPage> {
        let data: DiscoverPage = self.get_json(&self.discover_url(page, genre)).await?;
        debug!(
            page = data.page,
            total_pages = data.total_pages,
            results = data.results.len(),
            genre = ?genre,
            "Fetched TMDB discover page"
        );
        Ok(data)
    }
}

/// Full poster URL for a movie's `poster_path`.
pub fn poster_url(poster_path: Option<&str>) -> Option<String> {
    let path = poster_path?.trim();
    if path.is_empty() {
        return None;
    }
    let path = path.trim_start_matches('/');
    Some(format!("{POSTER_BASE}/{path}"))
}

fn redact_key(url: &str) -> String {
    match url.find("api_key=") {
        Some(start) => {
            let value_start = start + "api_key=".len();
            let value_end = url[value_start..]
                .find('&')
                .map(|i| value_start + i)
                .unwrap_or(url.len());
            format!("{}***{}", &url[..value_start], &url[value_end..])
        }
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TmdbClient {
        let mut settings = Settings::offline();
        settings.api_key = "k3y".to_string();
        TmdbClient::new(&settings).expect("client builds")
    }

    #[test]
    fn discover_url_includes_genre_only_when_selected() {
        let c = client();
        assert_eq!(
            c.discover_url(2, None),
            "https://api.themoviedb.org/3/discover/movie?api_key=k3y&page=2"
        );
        assert_eq!(
            c.discover_url(1, Some(28)),
            "https://api.themoviedb.org/3/discover/movie?api_key=k3y&page=1&with_genres=28"
        );
    }

    #[test]
    fn genres_url_targets_movie_genre_list() {
        assert_eq!(
            client().genres_url(),
            "https://api.themoviedb.org/3/genre/movie/list?api_key=k3y"
        );
    }

    #[test]
    fn poster_url_joins_with_single_slash() {
        assert_eq!(
            poster_url(Some("/abc.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg")
        );
        assert_eq!(poster_url(Some("  ")), None);
        assert_eq!(poster_url(None), None);
    }

    #[tokio::test]
    async fn transport_errors_do_not_leak_api_key() {
        let mut settings = Settings::offline();
        settings.api_key = "SECRETKEY".to_string();
        settings.api_base = "http://127.0.0.1:1/3".to_string();
        let client = TmdbClient::new(&settings).expect("client builds");

        let err = client.fetch_genres().await.expect_err("port 1 is unreachable");
        let rendered = format!("{:?}", err);
        assert!(!rendered.contains("SECRETKEY"), "{rendered}");
        assert!(rendered.contains("api_key=***"), "{rendered}");

        let err = client.discover_movies(1, Some(28)).await.expect_err("unreachable");
        assert!(!format!("{:#}", err).contains("SECRETKEY"));
    }

    #[test]
    fn error_messages_do_not_leak_api_key() {
        assert_eq!(
            redact_key("https://x/discover/movie?api_key=secret&page=1"),
            "https://x/discover/movie?api_key=***&page=1"
        );
        assert_eq!(
            redact_key("https://x/genre/movie/list?api_key=secret"),
            "https://x/genre/movie/list?api_key=***"
        );
    }
}
