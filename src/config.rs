use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";
const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub api_base: String,
    pub debounce: Duration,
    pub http_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("TMDB_API_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .context("TMDB_API_KEY not set")?;
        let api_base = env::var("TMDB_API_BASE")
            .ok()
            .filter(|s| !s.is_empty())
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let debounce_ms = parse_u64("CINEBROWSE_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS)?;
        let timeout_secs = parse_u64("CINEBROWSE_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        Ok(Self {
            api_key,
            api_base,
            debounce: Duration::from_millis(debounce_ms),
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    #[cfg(test)]
    pub(crate) fn offline() -> Self {
        Self {
            api_key: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

fn parse_u64(key: &str, default: u64) -> Result<u64> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'")),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_falls_back_to_default_when_unset() {
        assert_eq!(
            parse_u64("CINEBROWSE_TEST_SURELY_UNSET_VARIABLE", 42).unwrap(),
            42
        );
    }

    #[test]
    fn offline_settings_use_documented_defaults() {
        let s = Settings::offline();
        assert_eq!(s.api_base, DEFAULT_API_BASE);
        assert_eq!(s.debounce, Duration::from_millis(300));
        assert!(s.api_key.is_empty());
    }
}
