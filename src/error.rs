use std::path::PathBuf;

use thiserror::Error;

/// The guesser could not extract the fields a lookup needs from a file name.
///
/// Recoverable: the file is skipped and the rest of the batch continues.
#[derive(Debug, Error)]
#[error("could not match '{file_name}': {reason}")]
pub struct MismatchError {
    pub file_name: String,
    pub reason: MismatchReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MismatchReason {
    #[error("media type could not be guessed")]
    UnknownKind,
    #[error("missing required key '{0}'")]
    MissingKey(&'static str),
}

impl MismatchError {
    pub fn new(file_name: impl Into<String>, reason: MismatchReason) -> Self {
        Self {
            file_name: file_name.into(),
            reason,
        }
    }
}

/// Problems with the configuration, reported before the pipeline starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TMDB API key is missing (pass --api-key or set TMDB_API_KEY)")]
    MissingApiKey,
    #[error("extension allow list is empty")]
    EmptyAllowList,
    #[error("{0} must be at least 1")]
    ZeroLimit(&'static str),
    #[error("destination root {0:?} exists and is not a directory")]
    DestinationNotADirectory(PathBuf),
}
