use std::fs::File;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mvodb::cli::{Cli, ReviewMode};
use mvodb::mover::TransferMode;
use mvodb::pipeline::{Pipeline, RunOptions, RunReport};
use mvodb::review::{AutoApprove, ConsoleReviewer, PromptStyle, Reviewer};
use mvodb::tmdb::TmdbClient;
use mvodb::tui::TuiReviewer;

fn init_logging(cli: &Cli) -> Result<()> {
    // RUST_LOG wins over -v/-q
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,mvodb={}", cli.log_level())));

    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Cannot open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn reviewer_for(cli: &Cli) -> Box<dyn Reviewer> {
    if cli.no_confirm {
        return Box::new(AutoApprove);
    }
    match cli.review {
        ReviewMode::Immediate => Box::new(ConsoleReviewer::stdio(PromptStyle::Immediate)),
        ReviewMode::Batch => Box::new(ConsoleReviewer::stdio(PromptStyle::Batch)),
        ReviewMode::Tui => Box::new(TuiReviewer),
    }
}

fn print_summary(report: &RunReport, dry_run: bool) {
    println!("===================");
    println!(
        "Summary: {} {}, {} declined, {} skipped, {} failed ({} files found)",
        report.moved,
        if dry_run { "would be moved" } else { "moved" },
        report.declined,
        report.skipped(),
        report.failed,
        report.discovered
    );

    if report.has_failures() {
        println!("⚠ Some approved moves failed, see the log for details.");
    } else if report.moved > 0 {
        println!("✓ Done!");
    } else {
        println!("ℹ Nothing was moved.");
    }
}

async fn run(cli: Cli) -> Result<RunReport> {
    let config = cli.config_builder().build()?;
    info!(
        dest = %config.dest_root.display(),
        extensions = ?config.extension_allow_list,
        "Starting"
    );

    let service = TmdbClient::new(config.api_key.clone(), config.language.clone())?;
    let pipeline = Pipeline::new(config, Arc::new(service))?;

    let options = RunOptions {
        dry_run: cli.dry_run,
        mode: if cli.copy {
            TransferMode::Copy
        } else {
            TransferMode::Move
        },
    };

    let mut reviewer = reviewer_for(&cli);
    let (report, _results) = pipeline
        .run(&cli.files, reviewer.as_mut(), options)
        .await?;

    print_summary(&report, cli.dry_run);
    Ok(report)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }

    let logs_to_stderr = cli.logs_to_stderr();
    match run(cli).await {
        Ok(report) if report.has_failures() => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            // The stderr subscriber would print it a second time
            if !logs_to_stderr {
                error!("{:#}", e);
            }
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
