// src/main.rs

use anyhow::Result;
use clap::Parser;
use githubdl::cli::Cli;
use githubdl::config::{parse_log_level, ConfigBuilder};
use githubdl::errors::Error;
#[cfg(feature = "progress")]
use githubdl::progress::IndicatifProgress;
use githubdl::progress::ProgressReporter;
use githubdl::signal::setup_signal_handler;
use githubdl::{run, RunOutcome};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging. RUST_LOG still applies to dependencies.
    let level = parse_log_level(cli.log_level.as_deref(), cli.tags || cli.branches);
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                format!("githubdl={}", level.as_str().to_ascii_lowercase()).parse()?,
            ),
        )
        .init();

    log::info!("Starting githubdl v{}...", env!("CARGO_PKG_VERSION"));

    // --- Configuration ---
    let config = match ConfigBuilder::from_cli(cli).build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    log::debug!("Configuration built successfully: {:?}", config);

    let token = setup_signal_handler()?;

    // Show a spinner only when stderr is a TTY and we are downloading files.
    let progress_reporter: Option<Arc<dyn ProgressReporter>> = {
        #[cfg(feature = "progress")]
        {
            if atty::is(atty::Stream::Stderr) && !config.operation.is_info() {
                Some(Arc::new(IndicatifProgress::new()))
            } else {
                None
            }
        }
        #[cfg(not(feature = "progress"))]
        {
            None
        }
    };

    // --- Execution & Error Handling ---
    match run(&config, &token, progress_reporter) {
        Ok(RunOutcome::File(path)) | Ok(RunOutcome::Info(path)) => {
            log::info!("Saved {}", path.display());
        }
        Ok(RunOutcome::Directory(summary)) => {
            log::info!("Downloaded {} files", summary.files);
        }
        Err(Error::Interrupted) => {
            eprintln!("\nOperation cancelled.");
            std::process::exit(130);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
