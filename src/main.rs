use anyhow::Context;
use clap::Parser;
use frameprep::{BatchProcessor, Cli, ProgressStatus};
use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Debug
        } else if cli.quiet {
            LevelFilter::Error
        } else {
            LevelFilter::Info
        })
        .init();

    let config = cli.to_config();
    let processor = BatchProcessor::new(config).context("Invalid configuration")?;

    let mut run = processor.run();
    let pb = create_progress_bar(run.total(), cli.quiet)?;

    for event in run.by_ref() {
        pb.set_message(
            event
                .source_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );

        match event.status {
            ProgressStatus::Error => pb.println(format!(
                "Error processing {}: {}",
                event.source_path.display(),
                event.error_message.as_deref().unwrap_or("unknown error")
            )),
            ProgressStatus::Exists if cli.verbose => {
                pb.println(format!("Exists: {}", event.output_path.display()))
            }
            _ => {}
        }

        pb.inc(1);
    }

    let outcome = run.outcome();
    pb.finish_and_clear();

    let prefix = if cli.dry_run { "Dry run: " } else { "" };
    println!("\n{}{}", prefix, outcome);

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn create_progress_bar(total: usize, hidden: bool) -> anyhow::Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}
