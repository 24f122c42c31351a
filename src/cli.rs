use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::config::{ConfigBuilder, DEFAULT_CANDIDATES, DEFAULT_JOBS, DEFAULT_LANGUAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReviewMode {
    /// Confirm each file as it comes, with the other candidates on rejection
    Immediate,
    /// List every move first, then accept all or confirm one by one
    Batch,
    /// Full-screen review
    Tui,
}

#[derive(Debug, Parser)]
#[command(name = "mvodb")]
#[command(author, version, about = "Move and rename movies and TV episodes into a Plex-style library")]
pub struct Cli {
    /// Files or directories to move/rename
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Do not ask confirmation
    #[arg(short = 'y', long)]
    pub no_confirm: bool,

    /// How proposed moves are confirmed
    #[arg(long, value_enum, default_value_t = ReviewMode::Batch)]
    pub review: ReviewMode,

    /// Show what would be done without touching any file
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Copy files into the library instead of moving them
    #[arg(long)]
    pub copy: bool,

    /// Concurrent metadata lookups
    #[arg(short, long, default_value_t = DEFAULT_JOBS)]
    pub jobs: usize,

    /// Candidates offered per file
    #[arg(long, default_value_t = DEFAULT_CANDIDATES)]
    pub candidates: usize,

    /// Library root the formatted paths are placed under
    #[arg(short, long, env = "MVODB_DEST_ROOT")]
    pub dest: Option<PathBuf>,

    /// TMDB API key
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Directory for movies inside the library
    #[arg(long, env = "MVODB_MOVIE_PREFIX")]
    pub movie_prefix: Option<String>,

    /// Directory for TV shows inside the library
    #[arg(long, env = "MVODB_TVSHOW_PREFIX")]
    pub tvshow_prefix: Option<String>,

    /// Comma-separated list of extensions to pick up
    #[arg(long, env = "MVODB_EXTENSIONS", value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// Language of titles returned by TMDB
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn config_builder(&self) -> ConfigBuilder {
        let mut builder = ConfigBuilder::new()
            .api_key(self.api_key.clone())
            .movie_prefix(self.movie_prefix.clone())
            .tvshow_prefix(self.tvshow_prefix.clone())
            .language(self.language.clone())
            .candidate_limit(self.candidates)
            .jobs(self.jobs);

        if let Some(dest) = &self.dest {
            builder = builder.dest_root(dest);
        }
        if let Some(extensions) = &self.extensions {
            builder = builder.extensions(extensions);
        }
        builder
    }

    /// True unless `--log-file` redirects logging away from stderr.
    pub fn logs_to_stderr(&self) -> bool {
        self.log_file.is_none()
    }

    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_are_required() {
        assert!(Cli::try_parse_from(["mvodb"]).is_err());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["mvodb", "a.mkv", "dir"]).unwrap();
        assert_eq!(cli.files, vec![PathBuf::from("a.mkv"), PathBuf::from("dir")]);
        assert!(!cli.no_confirm);
        assert_eq!(cli.review, ReviewMode::Batch);
        assert_eq!(cli.jobs, 4);
        assert_eq!(cli.log_level(), "info");
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "mvodb",
            "-y",
            "--review",
            "tui",
            "-vv",
            "--extensions",
            "mkv,srt",
            "--api-key",
            "k",
            "x.mkv",
        ])
        .unwrap();
        assert!(cli.no_confirm);
        assert_eq!(cli.review, ReviewMode::Tui);
        assert_eq!(cli.log_level(), "trace");
        assert_eq!(cli.extensions, Some(vec!["mkv".to_string(), "srt".to_string()]));

        let config = cli.config_builder().build().unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.extension_allow_list, vec!["mkv", "srt"]);
    }

    #[test]
    fn test_log_destination() {
        let cli = Cli::try_parse_from(["mvodb", "x.mkv"]).unwrap();
        assert!(cli.logs_to_stderr());

        let cli = Cli::try_parse_from(["mvodb", "--log-file", "run.log", "x.mkv"]).unwrap();
        assert!(!cli.logs_to_stderr());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["mvodb", "-q", "-v", "x.mkv"]).is_err());
    }
}
