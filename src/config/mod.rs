//! Defines the core `Config` struct and related types for application configuration.
//!
//! This module consolidates all the settings parsed and validated from the CLI,
//! making them available to the rest of the application in a structured and
//! type-safe manner.

use crate::errors::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub use builder::ConfigBuilder;
pub use parsing::parse_log_level;
mod builder;
mod parsing;
mod validation;

/// The top-level operation of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Download one file, identified by its repository-relative path.
    File(String),
    /// Download a directory tree, identified by its repository-relative path.
    Directory(String),
    /// Save the repository's tags as JSON.
    Tags,
    /// Save the repository's branches as JSON.
    Branches,
}

impl Operation {
    /// Whether this operation only reads repository metadata.
    pub fn is_info(&self) -> bool {
        matches!(self, Operation::Tags | Operation::Branches)
    }
}

/// An API token. Its `Debug` output never reveals the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Picks the explicit token if present, else the one from the environment.
    /// Blank values count as missing.
    ///
    /// # Errors
    /// [`Error::MissingCredential`] when neither source yields a token.
    pub fn resolve(explicit: Option<String>, from_env: Option<String>) -> Result<Self> {
        explicit
            .filter(|t| !t.trim().is_empty())
            .or_else(|| from_env.filter(|t| !t.trim().is_empty()))
            .map(|t| Credential(t.trim().to_string()))
            .ok_or_else(|| {
                log::error!("No GitHub token given as a parameter or in the environment");
                Error::MissingCredential
            })
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Represents the fully validated configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// The repository URL as given (SSH or HTTP(S) form).
    pub repo_url: String,
    /// What to download.
    pub operation: Operation,
    /// File target (full path) or directory mirror root. `None` uses the defaults.
    pub target: Option<PathBuf>,
    /// Branch, tag or commit to read from. `None` uses the default branch.
    pub reference: Option<String>,
    /// Whether `.gitmodules` files found during a directory download are expanded.
    pub submodules: bool,
    /// Token sent with every API request.
    pub credential: Credential,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum number of concurrent requests.
    pub jobs: usize,
    /// Extra attempts for requests that fail at the network level.
    pub retries: u32,
    /// Directory that `tags.json` / `branches.json` are written to.
    pub output_dir: PathBuf,
}
