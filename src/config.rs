use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::naming::PathFormat;

pub const DEFAULT_EXTENSIONS: &[&str] = &[
    "srt", "mkv", "mp4", "avi", "m4v", "mov", "wmv", "ts", "webm", "sub", "ass", "ssa", "vtt",
];
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_CANDIDATES: usize = 3;
pub const DEFAULT_JOBS: usize = 4;

/// Everything the pipeline needs to know, passed explicitly into `pipeline::run`.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub dest_root: PathBuf,
    pub movie_prefix: String,
    pub tvshow_prefix: String,
    pub extension_allow_list: Vec<String>,
    pub language: String,
    pub candidate_limit: usize,
    pub jobs: usize,
}

impl Config {
    pub fn path_format(&self) -> PathFormat {
        PathFormat {
            movie_prefix: self.movie_prefix.clone(),
            tvshow_prefix: self.tvshow_prefix.clone(),
        }
    }

    pub fn allows_extension(&self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.extension_allow_list.iter().any(|e| *e == extension)
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    api_key: Option<String>,
    dest_root: Option<PathBuf>,
    movie_prefix: Option<String>,
    tvshow_prefix: Option<String>,
    extensions: Option<Vec<String>>,
    language: Option<String>,
    candidate_limit: Option<usize>,
    jobs: Option<usize>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn api_key(mut self, api_key: Option<String>) -> Self {
        // Blank values from the environment count as unset
        self.api_key = api_key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn dest_root<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.dest_root = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn movie_prefix(mut self, prefix: Option<String>) -> Self {
        self.movie_prefix = prefix;
        self
    }

    pub fn tvshow_prefix(mut self, prefix: Option<String>) -> Self {
        self.tvshow_prefix = prefix;
        self
    }

    /// Accepts entries with or without a leading dot, in any case.
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        self.extensions = Some(list);
        self
    }

    pub fn language(mut self, language: String) -> Self {
        self.language = Some(language);
        self
    }

    pub fn candidate_limit(mut self, limit: usize) -> Self {
        self.candidate_limit = Some(limit);
        self
    }

    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        let api_key = self.api_key.ok_or(ConfigError::MissingApiKey)?;

        let dest_root = self.dest_root.unwrap_or_else(|| PathBuf::from("."));
        if dest_root.exists() && !dest_root.is_dir() {
            return Err(ConfigError::DestinationNotADirectory(dest_root));
        }

        let extension_allow_list = self
            .extensions
            .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect());
        if extension_allow_list.is_empty() {
            return Err(ConfigError::EmptyAllowList);
        }

        let candidate_limit = self.candidate_limit.unwrap_or(DEFAULT_CANDIDATES);
        if candidate_limit == 0 {
            return Err(ConfigError::ZeroLimit("candidate limit"));
        }
        let jobs = self.jobs.unwrap_or(DEFAULT_JOBS);
        if jobs == 0 {
            return Err(ConfigError::ZeroLimit("jobs"));
        }

        let defaults = PathFormat::default();
        Ok(Config {
            api_key,
            dest_root,
            movie_prefix: self
                .movie_prefix
                .filter(|p| !p.is_empty())
                .unwrap_or(defaults.movie_prefix),
            tvshow_prefix: self
                .tvshow_prefix
                .filter(|p| !p.is_empty())
                .unwrap_or(defaults.tvshow_prefix),
            extension_allow_list,
            language: self.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            candidate_limit,
            jobs,
        })
    }
}
