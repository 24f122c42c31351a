use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{MismatchError, MismatchReason};
use crate::guess::{MediaKind, RawGuess};
use crate::naming::PathFormat;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaGuess {
    Movie { title: String, year: Option<u16> },
    Episode { show: String, season: u32, episode: u32 },
}

/// A discovered file together with what its name says it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    pub file_name: String,
    pub extension: String,
    pub guess: MediaGuess,
    pub subtitle_language: Option<String>,
}

impl MediaFile {
    /// Validate a raw guess. Movies need a title; episodes need a show, season and episode.
    pub fn from_guess(path: &Path, raw: RawGuess) -> Result<Self, MismatchError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        let mismatch = |reason| MismatchError::new(file_name.clone(), reason);

        let guess = match raw.kind {
            Some(MediaKind::Movie) => MediaGuess::Movie {
                title: raw.title.ok_or_else(|| mismatch(MismatchReason::MissingKey("title")))?,
                year: raw.year,
            },
            Some(MediaKind::Episode) => MediaGuess::Episode {
                show: raw.title.ok_or_else(|| mismatch(MismatchReason::MissingKey("title")))?,
                season: raw.season.ok_or_else(|| mismatch(MismatchReason::MissingKey("season")))?,
                episode: raw
                    .episode
                    .ok_or_else(|| mismatch(MismatchReason::MissingKey("episode")))?,
            },
            None => return Err(mismatch(MismatchReason::UnknownKind)),
        };

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            extension,
            guess,
            subtitle_language: raw.subtitle_language,
        })
    }

    pub fn kind(&self) -> MediaKind {
        match self.guess {
            MediaGuess::Movie { .. } => MediaKind::Movie,
            MediaGuess::Episode { .. } => MediaKind::Episode,
        }
    }

    pub fn lookup_key(&self) -> LookupKey {
        LookupKey::for_guess(&self.guess)
    }
}

/// Cache key for metadata lookups. Files that would send the same query share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LookupKey {
    Movie { title: String },
    Episode { show: String, season: u32, episode: u32 },
}

impl LookupKey {
    pub fn for_guess(guess: &MediaGuess) -> Self {
        match guess {
            MediaGuess::Movie { title, .. } => LookupKey::Movie {
                title: normalize_title(title),
            },
            MediaGuess::Episode {
                show,
                season,
                episode,
            } => LookupKey::Episode {
                show: normalize_title(show),
                season: *season,
                episode: *episode,
            },
        }
    }
}

fn normalize_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// A metadata record as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Movie {
        title: String,
        year: Option<String>,
    },
    Episode {
        show: String,
        season: u32,
        episode: u32,
        title: String,
    },
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Movie { title, year: Some(year) } => write!(f, "{} ({})", title, year),
            Identity::Movie { title, year: None } => write!(f, "{}", title),
            Identity::Episode {
                show,
                season,
                episode,
                title,
            } => write!(f, "{} - S{:02}E{:02} - {}", show, season, episode, title),
        }
    }
}

/// One ranked answer to "what is this file?".
#[derive(Debug, Clone)]
pub struct Candidate {
    pub identity: Identity,
    pub origin: Arc<MediaFile>,
}

impl Candidate {
    pub fn destination(&self, format: &PathFormat) -> PathBuf {
        format.format(
            &self.identity,
            &self.origin.extension,
            self.origin.subtitle_language.as_deref(),
        )
    }
}

/// A file with at least one candidate, best first.
#[derive(Debug, Clone)]
pub struct Proposal {
    pub media: Arc<MediaFile>,
    pub candidates: Vec<Candidate>,
}

impl Proposal {
    pub fn new(media: Arc<MediaFile>, identities: Vec<Identity>) -> Option<Self> {
        if identities.is_empty() {
            return None;
        }
        let candidates = identities
            .into_iter()
            .map(|identity| Candidate {
                identity,
                origin: Arc::clone(&media),
            })
            .collect();
        Some(Self { media, candidates })
    }

    pub fn top(&self) -> &Candidate {
        &self.candidates[0]
    }
}
