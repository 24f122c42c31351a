// Shared fixtures for the integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use mvodb::config::{Config, ConfigBuilder};
use mvodb::tmdb::{EpisodeHit, MetadataService, MovieHit, ShowHit};

/// In-memory metadata service that counts every call it receives.
#[derive(Default)]
pub struct FakeService {
    movies: HashMap<String, Vec<MovieHit>>,
    shows: HashMap<String, Vec<ShowHit>>,
    episodes: HashMap<(u64, u32, u32), String>,
    failing: HashSet<String>,
    failing_shows: HashSet<u64>,
    delay: Duration,
    pub movie_calls: AtomicUsize,
    pub show_calls: AtomicUsize,
    pub episode_calls: AtomicUsize,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movie(mut self, query: &str, results: &[(&str, &str)]) -> Self {
        let hits = results
            .iter()
            .enumerate()
            .map(|(i, (title, year))| MovieHit {
                id: i as u64 + 1,
                title: title.to_string(),
                year: if year.is_empty() { None } else { Some(year.to_string()) },
            })
            .collect();
        self.movies.insert(query.to_lowercase(), hits);
        self
    }

    pub fn with_show(mut self, query: &str, results: &[(u64, &str)]) -> Self {
        let hits = results
            .iter()
            .map(|(id, name)| ShowHit {
                id: *id,
                name: name.to_string(),
            })
            .collect();
        self.shows.insert(query.to_lowercase(), hits);
        self
    }

    pub fn with_episode(mut self, show_id: u64, season: u32, episode: u32, name: &str) -> Self {
        self.episodes.insert((show_id, season, episode), name.to_string());
        self
    }

    /// Searches for `query` fail with an error.
    pub fn failing(mut self, query: &str) -> Self {
        self.failing.insert(query.to_lowercase());
        self
    }

    /// Episode fetches for `show_id` fail with an error.
    pub fn failing_show(mut self, show_id: u64) -> Self {
        self.failing_shows.insert(show_id);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn movie_calls(&self) -> usize {
        self.movie_calls.load(Ordering::SeqCst)
    }

    pub fn show_calls(&self) -> usize {
        self.show_calls.load(Ordering::SeqCst)
    }

    pub fn episode_calls(&self) -> usize {
        self.episode_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl MetadataService for FakeService {
    async fn search_movies(&self, title: &str) -> Result<Vec<MovieHit>> {
        self.movie_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        let key = title.to_lowercase();
        if self.failing.contains(&key) {
            return Err(anyhow!("service unavailable"));
        }
        Ok(self.movies.get(&key).cloned().unwrap_or_default())
    }

    async fn search_shows(&self, name: &str) -> Result<Vec<ShowHit>> {
        self.show_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        let key = name.to_lowercase();
        if self.failing.contains(&key) {
            return Err(anyhow!("service unavailable"));
        }
        Ok(self.shows.get(&key).cloned().unwrap_or_default())
    }

    async fn episode(&self, show_id: u64, season: u32, episode: u32) -> Result<Option<EpisodeHit>> {
        self.episode_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        if self.failing_shows.contains(&show_id) {
            return Err(anyhow!("episode endpoint exploded"));
        }
        Ok(self
            .episodes
            .get(&(show_id, season, episode))
            .map(|name| EpisodeHit {
                season,
                episode,
                name: name.clone(),
            }))
    }
}

pub fn test_config(dest_root: &Path) -> Config {
    ConfigBuilder::new()
        .api_key(Some("test-key".to_string()))
        .dest_root(dest_root)
        .build()
        .unwrap()
}
