// End-to-end runs of the pipeline against an in-memory metadata service

mod common;

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use common::{test_config, FakeService};
use mvodb::mover::{MoveResult, TransferMode};
use mvodb::pipeline::{Pipeline, RunOptions};
use mvodb::review::{AutoApprove, ConsoleReviewer, PromptStyle};

fn touch(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn library_service() -> FakeService {
    FakeService::new()
        .with_movie("up", &[("Up", "2009"), ("Up in the Air", "2009")])
        .with_show("lost", &[(4607, "Lost")])
        .with_episode(4607, 1, 2, "Pilot (2)")
}

struct Fixture {
    _dir: tempfile::TempDir,
    inbox: PathBuf,
    library: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let inbox = dir.path().join("inbox");
    let library = dir.path().join("library");
    fs::create_dir_all(&inbox).unwrap();
    fs::create_dir_all(&library).unwrap();
    Fixture {
        _dir: dir,
        inbox,
        library,
    }
}

#[tokio::test]
async fn test_unparseable_file_does_not_stop_the_batch() {
    let fx = fixture();
    touch(&fx.inbox, "1080p.BluRay.mkv", "video");
    touch(&fx.inbox, "Lost.S01E02.mkv", "video");
    touch(&fx.inbox, "Up.2009.1080p.mkv", "video");
    touch(&fx.inbox, "Up.2009.eng.srt", "1\n00:00:01,000 --> 00:00:02,000\nHello\n");
    touch(&fx.inbox, "notes.txt", "ignored");

    let service = Arc::new(library_service());
    let pipeline = Pipeline::new(test_config(&fx.library), service.clone()).unwrap();

    let (report, results) = pipeline
        .run(&[&fx.inbox], &mut AutoApprove, RunOptions::default())
        .await
        .unwrap();

    assert_eq!(report.discovered, 4);
    assert_eq!(report.mismatched, 1);
    assert_eq!(report.moved, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(results.len(), 3);
    assert_eq!(service.movie_calls(), 1);

    assert!(fx.library.join("movies/Up (2009)/Up (2009).mkv").exists());
    assert!(fx.library.join("movies/Up (2009)/Up (2009).eng.srt").exists());
    assert!(fx
        .library
        .join("series/Lost/Season 01/Lost - S01E02 - Pilot (2).mkv")
        .exists());

    // The unparseable file stays where it was
    assert!(fx.inbox.join("1080p.BluRay.mkv").exists());
    assert!(!fx.inbox.join("Lost.S01E02.mkv").exists());
}

#[tokio::test]
async fn test_file_without_candidates_is_skipped() {
    let fx = fixture();
    touch(&fx.inbox, "Unknown.Movie.2001.mkv", "video");
    touch(&fx.inbox, "Up.2009.mkv", "video");

    let pipeline = Pipeline::new(test_config(&fx.library), Arc::new(library_service())).unwrap();
    let (report, _) = pipeline
        .run(&[&fx.inbox], &mut AutoApprove, RunOptions::default())
        .await
        .unwrap();

    assert_eq!(report.unmatched, 1);
    assert_eq!(report.moved, 1);
    assert!(fx.inbox.join("Unknown.Movie.2001.mkv").exists());
}

#[tokio::test]
async fn test_lookup_failure_is_isolated() {
    let fx = fixture();
    touch(&fx.inbox, "Broken.2010.mkv", "video");
    touch(&fx.inbox, "Up.2009.mkv", "video");

    let service = Arc::new(library_service().failing("broken"));
    let pipeline = Pipeline::new(test_config(&fx.library), service).unwrap();
    let (report, _) = pipeline
        .run(&[&fx.inbox], &mut AutoApprove, RunOptions::default())
        .await
        .unwrap();

    assert_eq!(report.lookup_failed, 1);
    assert_eq!(report.moved, 1);
    assert_eq!(report.skipped(), 1);
    assert!(!report.has_failures());
}

#[tokio::test]
async fn test_dry_run_touches_nothing() {
    let fx = fixture();
    let source = touch(&fx.inbox, "Up.2009.mkv", "video");

    let pipeline = Pipeline::new(test_config(&fx.library), Arc::new(library_service())).unwrap();
    let options = RunOptions {
        dry_run: true,
        mode: TransferMode::Move,
    };
    let (report, results) = pipeline.run(&[&source], &mut AutoApprove, options).await.unwrap();

    assert_eq!(report.moved, 1);
    assert!(matches!(results[0].1, MoveResult::DryRun(_)));
    assert!(source.exists());
    assert!(!fx.library.join("movies").exists());
}

#[tokio::test]
async fn test_declined_batch_moves_nothing() {
    let fx = fixture();
    let source = touch(&fx.inbox, "Up.2009.mkv", "video");

    let pipeline = Pipeline::new(test_config(&fx.library), Arc::new(library_service())).unwrap();
    let mut reviewer = ConsoleReviewer::new(Cursor::new(b"n\nn\n".to_vec()), Vec::new(), PromptStyle::Batch);
    let (report, results) = pipeline
        .run(&[&source], &mut reviewer, RunOptions::default())
        .await
        .unwrap();

    assert_eq!(report.declined, 1);
    assert_eq!(report.moved, 0);
    assert!(results.is_empty());
    assert!(source.exists());

    let output = String::from_utf8(reviewer.into_output()).unwrap();
    assert!(output.contains("Accept all? [y/N/e(ach)]"));
    assert!(output.contains("[Yn]"));
}

#[tokio::test]
async fn test_immediate_review_can_pick_another_candidate() {
    let fx = fixture();
    let source = touch(&fx.inbox, "Up.2009.mkv", "video");

    let pipeline = Pipeline::new(test_config(&fx.library), Arc::new(library_service())).unwrap();
    let mut reviewer = ConsoleReviewer::new(
        Cursor::new(b"n\n2\n".to_vec()),
        Vec::new(),
        PromptStyle::Immediate,
    );
    let (report, _) = pipeline
        .run(&[&source], &mut reviewer, RunOptions::default())
        .await
        .unwrap();

    assert_eq!(report.moved, 1);
    assert!(fx
        .library
        .join("movies/Up in the Air (2009)/Up in the Air (2009).mkv")
        .exists());
}

#[tokio::test]
async fn test_existing_destination_counts_as_failure() {
    let fx = fixture();
    let source = touch(&fx.inbox, "Up.2009.mkv", "new");
    let existing = fx.library.join("movies/Up (2009)");
    fs::create_dir_all(&existing).unwrap();
    fs::write(existing.join("Up (2009).mkv"), "old").unwrap();

    let pipeline = Pipeline::new(test_config(&fx.library), Arc::new(library_service())).unwrap();
    let (report, results) = pipeline
        .run(&[&source], &mut AutoApprove, RunOptions::default())
        .await
        .unwrap();

    assert!(report.has_failures());
    assert_eq!(results[0].1, MoveResult::AlreadyExists);
    assert_eq!(fs::read_to_string(existing.join("Up (2009).mkv")).unwrap(), "old");
    assert!(source.exists());
}

#[tokio::test]
async fn test_copy_mode_keeps_source() {
    let fx = fixture();
    let source = touch(&fx.inbox, "Lost.S01E02.mkv", "video");

    let pipeline = Pipeline::new(test_config(&fx.library), Arc::new(library_service())).unwrap();
    let options = RunOptions {
        dry_run: false,
        mode: TransferMode::Copy,
    };
    let (report, _) = pipeline.run(&[&source], &mut AutoApprove, options).await.unwrap();

    assert_eq!(report.moved, 1);
    assert!(source.exists());
    assert!(fx
        .library
        .join("series/Lost/Season 01/Lost - S01E02 - Pilot (2).mkv")
        .exists());
}

#[test]
fn test_subtitle_language_is_detected_from_contents() {
    let fx = fixture();
    let srt = touch(
        &fx.inbox,
        "Amelie.2001.srt",
        "1\n00:00:01,000 --> 00:00:04,000\n\
         Bonjour, je m'appelle Amélie et je travaille dans un petit café à Montmartre.\n\n\
         2\n00:00:05,000 --> 00:00:08,000\n\
         Tous les matins, je prends le métro pour aller au travail avec mes voisins.\n\n\
         3\n00:00:09,000 --> 00:00:12,000\n\
         Je pense que nous devrions partir maintenant, avant qu'il ne soit trop tard.\n\n\
         4\n00:00:13,000 --> 00:00:16,000\n\
         Il a fait un temps épouvantable toute la semaine et les routes sont encore couvertes de neige.\n\n\
         5\n00:00:17,000 --> 00:00:20,000\n\
         Elle nous a dit qu'elle nous appellerait quand le train arriverait à la gare demain matin.\n",
    );

    let pipeline = Pipeline::new(test_config(&fx.library), Arc::new(FakeService::new())).unwrap();
    let media = pipeline.prepare(&srt).unwrap();
    assert_eq!(media.subtitle_language.as_deref(), Some("fre"));
}

#[test]
fn test_short_subtitle_stays_untagged() {
    let fx = fixture();
    let srt = touch(&fx.inbox, "Movie.2009.srt", "1\n00:00:01,000 --> 00:00:02,000\nHello\n");

    let pipeline = Pipeline::new(test_config(&fx.library), Arc::new(FakeService::new())).unwrap();
    let media = pipeline.prepare(&srt).unwrap();
    assert_eq!(media.subtitle_language, None);
}

#[test]
fn test_language_in_name_wins_over_contents() {
    let fx = fixture();
    let srt = touch(&fx.inbox, "Up.2009.eng.srt", "Bonjour tout le monde, comment allez-vous aujourd'hui ?");

    let pipeline = Pipeline::new(test_config(&fx.library), Arc::new(FakeService::new())).unwrap();
    let media = pipeline.prepare(&srt).unwrap();
    assert_eq!(media.subtitle_language.as_deref(), Some("eng"));
}
