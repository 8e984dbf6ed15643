//! The `githubdl` prelude for convenient library usage.
//!
//! This module re-exports the most commonly used types, traits, and functions
//! from the `githubdl` library.
//!
//! # Example
//!
//! ```no_run
//! use githubdl::prelude::*;
//! # fn main() -> Result<()> {
//!
//! let config = ConfigBuilder::new()
//!     .repo_url("https://github.com/zellij-org/zellij")
//!     .file(".cargo/config.toml")
//!     .build()?;
//! let token = CancellationToken::new();
//! let outcome = run(&config, &token, None)?;
//! println!("{:?}", outcome);
//!
//! # Ok(())
//! # }
//! ```

pub use crate::cancellation::CancellationToken;
pub use crate::config::{Config, ConfigBuilder, Credential, Operation};
pub use crate::errors::{Error, Result};
pub use crate::git::{
    build_api_url, parse_gitmodules, resolve, ApiOperation, ContentFetcher, DownloadSummary,
    Downloader, RepoIdentity, Transport,
};
pub use crate::progress::ProgressReporter;
pub use crate::{execute, run, RunOutcome};
