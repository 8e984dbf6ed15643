// src/config/builder.rs

use super::validation::validate_builder_options;
use super::{Config, Credential, Operation};
use crate::cli::Cli;
use crate::constants::{DEFAULT_JOBS, DEFAULT_TIMEOUT_SECS, GITHUB_TOKEN_ENV};
use crate::errors::{ConfigError, Result};
use crate::git;
use std::path::PathBuf;
use std::time::Duration;

/// A builder for creating a [`Config`] programmatically or from the parsed [`Cli`].
///
/// # Examples
/// ```
/// use githubdl::config::{ConfigBuilder, Operation};
///
/// let config = ConfigBuilder::new()
///     .repo_url("https://github.com/zellij-org/zellij")
///     .directory("xtask")
///     .target("tmp_dir_1")
///     .token("my-token")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.operation, Operation::Directory("xtask".to_string()));
/// ```
#[derive(Debug, Default, Clone)]
pub struct ConfigBuilder {
    pub(super) repo_url: Option<String>,
    pub(super) operation: Option<Operation>,
    pub(super) target: Option<String>,
    pub(super) reference: Option<String>,
    pub(super) submodules: Option<bool>,
    pub(super) token: Option<String>,
    pub(super) timeout_secs: Option<u64>,
    pub(super) jobs: Option<usize>,
    pub(super) retries: Option<u32>,
    pub(super) output_dir: Option<String>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a builder with everything given on the command line.
    pub fn from_cli(cli: Cli) -> Self {
        let operation = if let Some(file) = cli.file {
            Some(Operation::File(file))
        } else if let Some(dir) = cli.dir {
            Some(Operation::Directory(dir))
        } else if cli.tags {
            Some(Operation::Tags)
        } else if cli.branches {
            Some(Operation::Branches)
        } else {
            None
        };

        Self {
            repo_url: Some(cli.url),
            operation,
            target: cli.target,
            reference: cli.reference,
            submodules: Some(cli.submodules),
            token: cli.git_token,
            timeout_secs: Some(cli.timeout),
            jobs: Some(cli.jobs),
            retries: Some(cli.retries),
            output_dir: None,
        }
    }

    pub fn repo_url(mut self, url: impl Into<String>) -> Self {
        self.repo_url = Some(url.into());
        self
    }

    pub fn file(mut self, path: impl Into<String>) -> Self {
        self.operation = Some(Operation::File(path.into()));
        self
    }

    pub fn directory(mut self, path: impl Into<String>) -> Self {
        self.operation = Some(Operation::Directory(path.into()));
        self
    }

    pub fn tags(mut self) -> Self {
        self.operation = Some(Operation::Tags);
        self
    }

    pub fn branches(mut self) -> Self {
        self.operation = Some(Operation::Branches);
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn submodules(mut self, enabled: bool) -> Self {
        self.submodules = Some(enabled);
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    /// Directory for `tags.json` / `branches.json` (default: the working directory).
    pub fn output_dir(mut self, dir: impl Into<String>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Validates the options and resolves the credential, falling back to the
    /// `GITHUB_TOKEN` environment variable.
    ///
    /// # Errors
    /// [`crate::errors::Error::InvalidUrlKind`] for an unusable repository URL,
    /// [`crate::errors::Error::Config`] for invalid option combinations, and
    /// [`crate::errors::Error::MissingCredential`] when no token is available.
    pub fn build(self) -> Result<Config> {
        let env_token = std::env::var(GITHUB_TOKEN_ENV).ok();
        self.build_with_env_token(env_token)
    }

    /// Like [`ConfigBuilder::build`], with the environment token passed in.
    pub fn build_with_env_token(self, env_token: Option<String>) -> Result<Config> {
        let repo_url = self.repo_url.clone().ok_or_else(|| ConfigError::InvalidValue {
            option: "--url".to_string(),
            reason: "a repository url is required".to_string(),
        })?;
        git::resolve(&repo_url)?;
        validate_builder_options(&self)?;

        let credential = Credential::resolve(self.token, env_token)?;
        let operation = self.operation.ok_or_else(|| ConfigError::InvalidValue {
            option: "operation".to_string(),
            reason: "one of --file, --dir, --tags or --branches is required".to_string(),
        })?;

        Ok(Config {
            repo_url,
            operation,
            target: self.target.filter(|t| !t.is_empty()).map(PathBuf::from),
            reference: self.reference.filter(|r| !r.is_empty()),
            submodules: self.submodules.unwrap_or(false),
            credential,
            timeout: Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            jobs: self.jobs.unwrap_or(DEFAULT_JOBS),
            retries: self.retries.unwrap_or(0),
            output_dir: PathBuf::from(self.output_dir.unwrap_or_else(|| ".".to_string())),
        })
    }
}
