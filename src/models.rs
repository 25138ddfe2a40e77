use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// One page of `/discover/movie`.
#[derive(Debug, Deserialize, Clone)]
pub struct DiscoverPage {
    #[serde(default)]
    pub page: u32,
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: u32,
}

impl DiscoverPage {
    pub fn is_last(&self) -> bool {
        self.total_pages > 0 && self.page >= self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_discover_results_with_null_poster() {
        let value = json!({
            "page": 1,
            "total_pages": 3,
            "total_results": 60,
            "results": [
                { "id": 603, "title": "The Matrix", "poster_path": "/abc.jpg", "genre_ids": [28, 878], "adult": false },
                { "id": 1, "title": "Untitled", "poster_path": null }
            ]
        });
        let page: DiscoverPage = serde_json::from_value(value).expect("discover deserialize");
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].genre_ids, vec![28, 878]);
        assert_eq!(page.results[1].poster_path, None);
        assert!(page.results[1].genre_ids.is_empty());
        assert!(!page.is_last());
    }

    #[test]
    fn last_page_requires_known_total() {
        let page = DiscoverPage {
            page: 5,
            results: Vec::new(),
            total_pages: 0,
        };
        assert!(!page.is_last());
        let page = DiscoverPage {
            page: 5,
            results: Vec::new(),
            total_pages: 5,
        };
        assert!(page.is_last());
    }
}
