use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, warn};

use crate::media::{Identity, LookupKey, MediaFile, MediaGuess};
use crate::tmdb::MetadataService;

/// Turns guesses into ranked metadata identities.
///
/// Lookups are memoized per `LookupKey` for the lifetime of the resolver.
/// Concurrent lookups of the same key wait on the first one instead of
/// sending their own request. Failed lookups are not cached.
pub struct CandidateResolver {
    service: Arc<dyn MetadataService>,
    limit: usize,
    cache: Mutex<HashMap<LookupKey, Arc<OnceCell<Vec<Identity>>>>>,
}

impl CandidateResolver {
    pub fn new(service: Arc<dyn MetadataService>, limit: usize) -> Self {
        Self {
            service,
            limit,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub async fn lookup(&self, guess: &MediaGuess) -> Result<Vec<Identity>> {
        let key = LookupKey::for_guess(guess);
        let cell = {
            let mut cache = self.cache.lock().await;
            Arc::clone(cache.entry(key).or_default())
        };

        let identities = cell.get_or_try_init(|| self.fetch(guess)).await?;
        Ok(identities.clone())
    }

    /// Look up every file with at most `jobs` requests in flight.
    ///
    /// Results come back in input order; one failure does not affect the others.
    pub async fn resolve_all(
        &self,
        files: Vec<Arc<MediaFile>>,
        jobs: usize,
    ) -> Vec<(Arc<MediaFile>, Result<Vec<Identity>>)> {
        stream::iter(files)
            .map(|media| async move {
                let result = self.lookup(&media.guess).await;
                (media, result)
            })
            .buffered(jobs.max(1))
            .collect()
            .await
    }

    async fn fetch(&self, guess: &MediaGuess) -> Result<Vec<Identity>> {
        match guess {
            MediaGuess::Movie { title, .. } => {
                let hits = self.service.search_movies(title).await?;
                debug!(query = %title, results = hits.len(), "Movie search done");
                Ok(hits
                    .into_iter()
                    .take(self.limit)
                    .map(|hit| Identity::Movie {
                        title: hit.title,
                        year: hit.year,
                    })
                    .collect())
            }
            MediaGuess::Episode {
                show,
                season,
                episode,
            } => {
                let shows = self.service.search_shows(show).await?;
                debug!(query = %show, results = shows.len(), "Show search done");

                let lookups = shows.into_iter().take(self.limit).map(|hit| async move {
                    let result = self.service.episode(hit.id, *season, *episode).await;
                    (hit, result)
                });

                let mut identities = Vec::new();
                for (hit, result) in join_all(lookups).await {
                    match result {
                        Ok(Some(ep)) => identities.push(Identity::Episode {
                            show: hit.name,
                            season: ep.season,
                            episode: ep.episode,
                            title: ep.name,
                        }),
                        Ok(None) => {
                            debug!(show = %hit.name, season, episode, "No such episode, skipping show")
                        }
                        Err(e) => {
                            warn!(show = %hit.name, season, episode, "Episode lookup failed: {:#}", e)
                        }
                    }
                }
                Ok(identities)
            }
        }
    }
}
