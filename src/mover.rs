use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{error, info};

/// A proposed move. `destination` is relative to the library root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveItem {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub approved: bool,
}

impl MoveItem {
    pub fn new(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
            approved: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveResult {
    Success(PathBuf),
    DryRun(PathBuf),
    AlreadyExists,
    NoPermission,
    SourceNotFound,
    OtherError(String),
}

impl MoveResult {
    pub fn is_success(&self) -> bool {
        matches!(self, MoveResult::Success(_) | MoveResult::DryRun(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    #[default]
    Move,
    Copy,
}

#[derive(Debug, Default)]
pub struct MoveReport {
    pub moved: usize,
    pub failed: usize,
    pub declined: usize,
}

#[derive(Debug, Clone)]
pub struct Mover {
    root: PathBuf,
    mode: TransferMode,
    dry_run: bool,
}

impl Mover {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            mode: TransferMode::Move,
            dry_run: false,
        }
    }

    pub fn mode(mut self, mode: TransferMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn target_of(&self, item: &MoveItem) -> PathBuf {
        self.root.join(&item.destination)
    }

    pub fn execute(&self, item: &MoveItem) -> MoveResult {
        let target = self.target_of(item);

        if !item.source.exists() {
            return MoveResult::SourceNotFound;
        }
        if target.exists() {
            return MoveResult::AlreadyExists;
        }
        if self.dry_run {
            return MoveResult::DryRun(target);
        }

        if let Some(parent) = target.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                return classify(e);
            }
        }

        let outcome = match self.mode {
            TransferMode::Move => move_file(&item.source, &target),
            TransferMode::Copy => fs::copy(&item.source, &target).map(|_| ()),
        };

        match outcome {
            Ok(()) => MoveResult::Success(target),
            Err(e) => classify(e),
        }
    }

    /// Execute every approved item; declined items are never touched.
    ///
    /// A target filled earlier in the same batch counts as existing, so a
    /// dry run reports the same collisions a real run would hit.
    pub fn execute_all(&self, items: &[MoveItem]) -> (MoveReport, Vec<(MoveItem, MoveResult)>) {
        let mut report = MoveReport::default();
        let mut results = Vec::new();
        let mut claimed: HashSet<PathBuf> = HashSet::new();

        for item in items {
            if !item.approved {
                report.declined += 1;
                continue;
            }

            let result = if claimed.contains(&self.target_of(item)) {
                MoveResult::AlreadyExists
            } else {
                self.execute(item)
            };
            match &result {
                MoveResult::Success(target) => {
                    info!(from = %item.source.display(), to = %target.display(), "Moved");
                    claimed.insert(target.clone());
                    report.moved += 1;
                }
                MoveResult::DryRun(target) => {
                    info!(from = %item.source.display(), to = %target.display(), "Would move");
                    claimed.insert(target.clone());
                    report.moved += 1;
                }
                failure => {
                    error!(from = %item.source.display(), to = %item.destination.display(), "Move failed: {:?}", failure);
                    report.failed += 1;
                }
            }
            results.push((item.clone(), result));
        }

        (report, results)
    }
}

// rename() cannot cross filesystems; fall back to copy + remove
fn move_file(source: &Path, target: &Path) -> io::Result<()> {
    match fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(source, target)?;
            fs::remove_file(source)
        }
        Err(e) => Err(e),
    }
}

fn classify(e: io::Error) -> MoveResult {
    match e.kind() {
        io::ErrorKind::NotFound => MoveResult::SourceNotFound,
        io::ErrorKind::PermissionDenied => MoveResult::NoPermission,
        io::ErrorKind::AlreadyExists => MoveResult::AlreadyExists,
        _ => MoveResult::OtherError(e.to_string()),
    }
}
