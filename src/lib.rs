//! mvodb - move and rename media files into a Plex-style library.
//!
//! File names are guessed into movie or episode identities, looked up on
//! TMDB, reviewed by the operator and then moved under a destination root.

pub mod cli;
pub mod config;
pub mod error;
pub mod guess;
pub mod language;
pub mod media;
pub mod mover;
pub mod naming;
pub mod pipeline;
pub mod resolver;
pub mod review;
pub mod scan;
pub mod tmdb;
pub mod tui;

pub use config::{Config, ConfigBuilder};
pub use error::{ConfigError, MismatchError};
pub use media::{Candidate, Identity, LookupKey, MediaFile, Proposal};
pub use mover::{MoveItem, MoveResult, Mover, TransferMode};
pub use naming::{format_path, PathFormat};
pub use pipeline::{Pipeline, RunOptions, RunReport};
pub use review::{AutoApprove, ConsoleReviewer, PromptStyle, Reviewer};
pub use tmdb::{MetadataService, TmdbClient};
