use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::MismatchError;
use crate::guess::{Guesser, ReleaseNameGuesser};
use crate::language::{detect_file_language, is_subtitle, LanguageDetector, WhatlangDetector};
use crate::media::{MediaFile, Proposal};
use crate::mover::{MoveItem, MoveResult, Mover, TransferMode};
use crate::resolver::CandidateResolver;
use crate::review::Reviewer;
use crate::scan;
use crate::tmdb::MetadataService;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub mode: TransferMode,
}

/// Per-run counters; every discovered file lands in exactly one bucket.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub discovered: usize,
    pub mismatched: usize,
    pub lookup_failed: usize,
    pub unmatched: usize,
    pub declined: usize,
    pub moved: usize,
    pub failed: usize,
}

impl RunReport {
    pub fn skipped(&self) -> usize {
        self.mismatched + self.lookup_failed + self.unmatched
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

pub struct Pipeline {
    config: Config,
    guesser: Box<dyn Guesser>,
    detector: Box<dyn LanguageDetector>,
    resolver: CandidateResolver,
}

impl Pipeline {
    pub fn new(config: Config, service: Arc<dyn MetadataService>) -> Result<Self> {
        let guesser = ReleaseNameGuesser::new()?;
        Ok(Self::with_collaborators(
            config,
            service,
            Box::new(guesser),
            Box::new(WhatlangDetector),
        ))
    }

    pub fn with_collaborators(
        config: Config,
        service: Arc<dyn MetadataService>,
        guesser: Box<dyn Guesser>,
        detector: Box<dyn LanguageDetector>,
    ) -> Self {
        let resolver = CandidateResolver::new(service, config.candidate_limit);
        Self {
            config,
            guesser,
            detector,
            resolver,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Guess what a single file is, detecting subtitle language when the name does not say.
    pub fn prepare(&self, path: &Path) -> Result<MediaFile, MismatchError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let raw = self.guesser.guess(&file_name);
        let mut media = MediaFile::from_guess(path, raw)?;

        if media.subtitle_language.is_none() && is_subtitle(&media.extension) {
            media.subtitle_language = detect_file_language(self.detector.as_ref(), path);
        }
        Ok(media)
    }

    /// Discover, guess and look up. Files that fail any step are logged and counted, not returned.
    pub async fn plan<P: AsRef<Path>>(&self, inputs: &[P], report: &mut RunReport) -> Vec<Proposal> {
        let paths: Vec<PathBuf> = scan::discover(inputs, &self.config.extension_allow_list);
        report.discovered += paths.len();

        let mut media_files = Vec::with_capacity(paths.len());
        for path in &paths {
            match self.prepare(path) {
                Ok(media) => media_files.push(Arc::new(media)),
                Err(e) => {
                    error!(path = %path.display(), "{}", e);
                    report.mismatched += 1;
                }
            }
        }

        let resolved = self.resolver.resolve_all(media_files, self.config.jobs).await;

        let mut proposals = Vec::with_capacity(resolved.len());
        for (media, result) in resolved {
            match result {
                Ok(identities) => match Proposal::new(Arc::clone(&media), identities) {
                    Some(proposal) => proposals.push(proposal),
                    None => {
                        warn!(path = %media.path.display(), guess = ?media.guess, "No candidates found, skipping");
                        report.unmatched += 1;
                    }
                },
                Err(e) => {
                    error!(path = %media.path.display(), "Metadata lookup failed: {:#}", e);
                    report.lookup_failed += 1;
                }
            }
        }
        proposals
    }

    pub async fn run<P: AsRef<Path>>(
        &self,
        inputs: &[P],
        reviewer: &mut dyn Reviewer,
        options: RunOptions,
    ) -> Result<(RunReport, Vec<(MoveItem, MoveResult)>)> {
        let mut report = RunReport::default();
        let proposals = self.plan(inputs, &mut report).await;
        if proposals.is_empty() {
            info!(discovered = report.discovered, "Nothing to move");
            return Ok((report, Vec::new()));
        }

        let items = reviewer.review(&proposals, &self.config.path_format())?;

        let mover = Mover::new(&self.config.dest_root)
            .mode(options.mode)
            .dry_run(options.dry_run);
        let (moves, results) = mover.execute_all(&items);

        report.moved = moves.moved;
        report.failed = moves.failed;
        report.declined = moves.declined;
        Ok((report, results))
    }
}
