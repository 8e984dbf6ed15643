//! `githubdl` is a library and command-line tool for downloading individual files
//! and directory trees from GitHub and GitHub Enterprise repositories through the
//! REST API, without cloning them.
//!
//! It can also save a repository's tags or branches as JSON, and, when asked,
//! follow `.gitmodules` files to download submodule contents in place.
//!
//! As a library, it is organised in three layers:
//! 1.  **Resolve**: Turn SSH or HTTP(S) repository URLs into a host and `owner/repo`
//!     path ([`git::resolve`]) and build API URLs from them ([`git::build_api_url`]).
//! 2.  **Fetch**: Issue authenticated requests through a [`git::Transport`] and decode
//!     raw files, directory listings and metadata ([`git::ContentFetcher`]).
//! 3.  **Download**: Mirror files and trees to disk in parallel ([`git::Downloader`]).
//!
//! # Example: Library Usage
//!
//! ```
//! use githubdl::git::build_api_url;
//! use githubdl::git::{resolve, ApiOperation};
//!
//! let identity = resolve("git@github.com:zellij-org/zellij.git").unwrap();
//! assert_eq!(identity.owner_repo, "zellij-org/zellij");
//!
//! let url = build_api_url(&identity, Some("xtask"), Some("v0.42.2"), ApiOperation::Contents);
//! assert_eq!(
//!     url,
//!     "https://api.github.com/repos/zellij-org/zellij/contents/xtask?ref=v0.42.2"
//! );
//! ```

pub mod cancellation;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod git;
pub mod prelude;
pub mod progress;
pub mod signal;

// Re-export key public types for easier use as a library
pub use cancellation::CancellationToken;
pub use config::{Config, ConfigBuilder};
pub use errors::{Error, Result};

use crate::config::Operation;
use crate::constants::{BRANCHES_FILE, TAGS_FILE};
use crate::errors::io_error_with_path;
use crate::git::{ContentFetcher, DownloadSummary, Downloader, HttpTransport};
use crate::progress::ProgressReporter;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The path a single file was written to.
    File(PathBuf),
    /// Counters for a directory download.
    Directory(DownloadSummary),
    /// The JSON file tags or branches were saved to.
    Info(PathBuf),
}

/// Executes a complete run against the real GitHub API.
///
/// Builds an authenticated HTTP transport from the configuration, then delegates
/// to [`execute`].
///
/// # Arguments
/// * `config` - The validated configuration for the run.
/// * `token` - Cancelled on Ctrl+C; checked before every request.
/// * `progress` - Optional reporter, ticked once per written file.
pub fn run(
    config: &Config,
    token: &CancellationToken,
    progress: Option<Arc<dyn ProgressReporter>>,
) -> Result<RunOutcome> {
    let transport = HttpTransport::new(&config.credential, config.timeout)?;
    let fetcher = ContentFetcher::new(Arc::new(transport)).with_retries(config.retries);
    let mut downloader = Downloader::new(fetcher, config.jobs)?.with_cancellation(token.clone());
    if let Some(progress) = progress.clone() {
        downloader = downloader.with_progress(progress);
    }

    let outcome = execute(config, &downloader)?;
    if let Some(progress) = progress {
        progress.finish_with_message(describe(&outcome));
    }
    Ok(outcome)
}

/// Performs the configured operation with an already built [`Downloader`].
///
/// Tags and branches are written, pretty-printed, to `tags.json` or
/// `branches.json` inside `config.output_dir`.
pub fn execute(config: &Config, downloader: &Downloader) -> Result<RunOutcome> {
    let reference = config.reference.as_deref();
    match &config.operation {
        Operation::File(path) => {
            log::info!("Downloading file {} from {}", path, config.repo_url);
            let written = downloader.download_file(
                &config.repo_url,
                path,
                config.target.as_deref(),
                reference,
            )?;
            Ok(RunOutcome::File(written))
        }
        Operation::Directory(path) => {
            log::info!("Downloading directory {} from {}", path, config.repo_url);
            let summary = downloader.download_directory(
                &config.repo_url,
                path,
                config.target.as_deref(),
                reference,
                config.submodules,
            )?;
            Ok(RunOutcome::Directory(summary))
        }
        Operation::Tags => {
            let tags = downloader.list_tags(&config.repo_url)?;
            save_json(config, TAGS_FILE, &tags).map(RunOutcome::Info)
        }
        Operation::Branches => {
            let branches = downloader.list_branches(&config.repo_url)?;
            save_json(config, BRANCHES_FILE, &branches).map(RunOutcome::Info)
        }
    }
}

fn save_json(config: &Config, file_name: &str, value: &serde_json::Value) -> Result<PathBuf> {
    let path = config.output_dir.join(file_name);
    let mut bytes = serde_json::to_vec_pretty(value).map_err(|source| {
        Error::MalformedResponse {
            url: config.repo_url.clone(),
            source,
        }
    })?;
    bytes.push(b'\n');
    log::info!("Writing to file: {}", path.display());
    fs::write(&path, bytes).map_err(|e| io_error_with_path(e, &path))?;
    Ok(path)
}

fn describe(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::File(path) => format!("Saved {}", path.display()),
        RunOutcome::Directory(summary) => format!(
            "Downloaded {} files ({} bytes)",
            summary.files, summary.bytes
        ),
        RunOutcome::Info(path) => format!("Saved {}", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::{HttpResponse, Transport};
    use std::collections::HashMap;
    use tempfile::tempdir;

    struct Fixed(HashMap<String, Vec<u8>>);

    impl Transport for Fixed {
        fn get(&self, url: &str) -> Result<HttpResponse> {
            Ok(match self.0.get(url) {
                Some(body) => HttpResponse {
                    status: 200,
                    body: body.clone(),
                },
                None => HttpResponse {
                    status: 404,
                    body: br#"{"message":"Not Found"}"#.to_vec(),
                },
            })
        }
    }

    fn downloader(routes: &[(&str, &str)]) -> Downloader {
        let map = routes
            .iter()
            .map(|(u, b)| (u.to_string(), b.as_bytes().to_vec()))
            .collect();
        Downloader::new(ContentFetcher::new(Arc::new(Fixed(map))), 2).unwrap()
    }

    #[test]
    fn test_execute_tags_writes_pretty_json() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let config = ConfigBuilder::new()
            .repo_url("https://github.com/o/r")
            .tags()
            .token("t")
            .output_dir(temp.path().to_str().unwrap())
            .build_with_env_token(None)?;
        let d = downloader(&[(
            "https://api.github.com/repos/o/r/tags",
            r#"[{"name":"v1"}]"#,
        )]);

        let outcome = execute(&config, &d)?;
        let expected = temp.path().join("tags.json");
        assert_eq!(outcome, RunOutcome::Info(expected.clone()));
        let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(expected)?)?;
        assert_eq!(saved[0]["name"], "v1");
        Ok(())
    }

    #[test]
    fn test_execute_file_propagates_not_found() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let config = ConfigBuilder::new()
            .repo_url("https://github.com/o/r")
            .file("missing.txt")
            .target(temp.path().join("missing.txt").to_str().unwrap())
            .token("t")
            .build_with_env_token(None)?;
        let result = execute(&config, &downloader(&[]));
        assert!(matches!(
            result,
            Err(Error::UpstreamApi { status: 404, .. })
        ));
        assert!(!temp.path().join("missing.txt").exists());
        Ok(())
    }

    #[test]
    fn test_describe_outcomes() {
        assert_eq!(
            describe(&RunOutcome::Directory(DownloadSummary {
                files: 2,
                bytes: 10,
                ..Default::default()
            })),
            "Downloaded 2 files (10 bytes)"
        );
    }
}
