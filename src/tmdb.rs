//! TMDB (The Movie Database) v3 client.
//!
//! Only the three endpoints the resolver needs are wrapped: movie search,
//! TV search and single-episode details.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieHit {
    pub id: u64,
    pub title: String,
    pub year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowHit {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeHit {
    pub season: u32,
    pub episode: u32,
    pub name: String,
}

/// The remote metadata search API, ranked results first.
#[async_trait]
pub trait MetadataService: Send + Sync {
    async fn search_movies(&self, title: &str) -> Result<Vec<MovieHit>>;

    async fn search_shows(&self, name: &str) -> Result<Vec<ShowHit>>;

    /// `Ok(None)` when the show has no such episode.
    async fn episode(&self, show_id: u64, season: u32, episode: u32) -> Result<Option<EpisodeHit>>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse<T> {
    results: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct MovieResult {
    id: u64,
    title: Option<String>,
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TvResult {
    id: u64,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EpisodeResult {
    name: Option<String>,
    season_number: Option<u32>,
    episode_number: Option<u32>,
}

pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl TmdbClient {
    pub fn new(api_key: String, language: String) -> Result<Self> {
        Self::with_base_url(TMDB_BASE_URL, api_key, language)
    }

    pub fn with_base_url(base_url: &str, api_key: String, language: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("mvodb/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            language,
        })
    }

    // GET with 429 back-off. Returns the raw response so callers can inspect 404s.
    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        let mut retries = 0u32;
        loop {
            let response = self
                .client
                .get(&url)
                .query(&[("api_key", self.api_key.as_str()), ("language", self.language.as_str())])
                .query(params)
                .send()
                .await
                .with_context(|| format!("TMDB request failed: {}", path))?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                retries += 1;
                let wait = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!(retry = retries, wait_secs = wait, "TMDB returned 429, backing off");
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            return Ok(response);
        }
    }
}

#[async_trait]
impl MetadataService for TmdbClient {
    async fn search_movies(&self, title: &str) -> Result<Vec<MovieHit>> {
        debug!(query = title, "Searching TMDB movies");
        let response: SearchResponse<MovieResult> = self
            .get("/search/movie", &[("query", title)])
            .await?
            .error_for_status()
            .with_context(|| format!("TMDB movie search failed for '{}'", title))?
            .json()
            .await
            .context("Invalid TMDB movie search response")?;

        Ok(response
            .results
            .into_iter()
            .filter_map(|r| {
                let title = r.title.filter(|t| !t.is_empty())?;
                Some(MovieHit {
                    id: r.id,
                    title,
                    year: parse_year(r.release_date.as_deref()),
                })
            })
            .collect())
    }

    async fn search_shows(&self, name: &str) -> Result<Vec<ShowHit>> {
        debug!(query = name, "Searching TMDB shows");
        let response: SearchResponse<TvResult> = self
            .get("/search/tv", &[("query", name)])
            .await?
            .error_for_status()
            .with_context(|| format!("TMDB TV search failed for '{}'", name))?
            .json()
            .await
            .context("Invalid TMDB TV search response")?;

        Ok(response
            .results
            .into_iter()
            .filter_map(|r| {
                let name = r.name.filter(|n| !n.is_empty())?;
                Some(ShowHit { id: r.id, name })
            })
            .collect())
    }

    async fn episode(&self, show_id: u64, season: u32, episode: u32) -> Result<Option<EpisodeHit>> {
        let path = format!("/tv/{}/season/{}/episode/{}", show_id, season, episode);
        let response = self.get(&path, &[]).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!(show_id, season, episode, "Episode not found");
            return Ok(None);
        }

        let result: EpisodeResult = response
            .error_for_status()
            .with_context(|| format!("TMDB episode lookup failed: {}", path))?
            .json()
            .await
            .context("Invalid TMDB episode response")?;

        Ok(Some(EpisodeHit {
            season: result.season_number.unwrap_or(season),
            episode: result.episode_number.unwrap_or(episode),
            name: result.name.unwrap_or_default(),
        }))
    }
}

// "2009-05-28" -> "2009"
fn parse_year(date: Option<&str>) -> Option<String> {
    let year = date?.split('-').next()?;
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        Some(year.to_string())
    } else {
        None
    }
}
