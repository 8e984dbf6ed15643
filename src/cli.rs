// src/cli.rs

use crate::constants::{DEFAULT_JOBS, DEFAULT_TIMEOUT_SECS};
use clap::{ArgGroup, Parser};

/// GitHub path downloader.
///
/// Download files and directories from GitHub and GitHub Enterprise without
/// cloning the repository, or save the repository's tags and branches as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("operation")
        .required(true)
        .args(["file", "dir", "tags", "branches"]),
))]
pub struct Cli {
    // --- Operations (exactly one) ---
    /// The path of the file to download.
    #[arg(short = 'f', long, value_name = "FILE")]
    pub file: Option<String>,

    /// The path of the directory to download.
    #[arg(short = 'd', long, value_name = "DIR")]
    pub dir: Option<String>,

    /// Save the list of tags to tags.json.
    #[arg(short = 'a', long, action = clap::ArgAction::SetTrue)]
    pub tags: bool,

    /// Save the list of branches to branches.json.
    #[arg(short = 'b', long, action = clap::ArgAction::SetTrue)]
    pub branches: bool,

    // --- Repository ---
    /// The url of the repository (https://host/owner/repo or git@host:owner/repo.git).
    #[arg(short = 'u', long, value_name = "URL")]
    pub url: String,

    /// The name of the commit/branch/tag. Default: the repository's default branch.
    #[arg(short = 'r', long, value_name = "REF")]
    pub reference: Option<String>,

    /// Also download the submodules declared in downloaded .gitmodules files.
    #[arg(short = 's', long, action = clap::ArgAction::SetTrue)]
    pub submodules: bool,

    // --- Output ---
    /// Where to save the data. For --file, the full target file path (default: the
    /// file's name). For --dir, the root the directory is mirrored under (default: .).
    #[arg(short = 't', long, value_name = "PATH")]
    pub target: Option<String>,

    // --- Authentication & Transport ---
    /// The GitHub/GitHub Enterprise token. Defaults to the GITHUB_TOKEN environment variable.
    #[arg(short = 'g', long = "git-token", alias = "git_token", value_name = "TOKEN")]
    pub git_token: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Maximum number of concurrent requests.
    #[arg(short = 'j', long, value_name = "N", default_value_t = DEFAULT_JOBS)]
    pub jobs: usize,

    /// Retry requests that fail at the network level up to N times.
    #[arg(long, value_name = "N", default_value_t = 0)]
    pub retries: u32,

    // --- Logging ---
    /// Log level: DEBUG, INFO, WARN, ERROR or CRITICAL. Defaults to INFO (WARN for --tags/--branches).
    #[arg(short = 'l', long = "log-level", alias = "log_level", value_name = "LEVEL")]
    pub log_level: Option<String>,
}
