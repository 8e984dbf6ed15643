//! Defines application-specific error types.
//!
//! This module provides the `Error` enum, which categorizes the failures that can
//! occur while resolving a repository URL, talking to the GitHub API and mirroring
//! content to disk. Every variant aborts the current invocation; files written by
//! earlier, completed steps are left on disk.

use thiserror::Error;

/// Errors raised while validating configuration values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Two options were given that cannot be used together.
    #[error("Cannot use {option1} and {option2} simultaneously.")]
    Conflict { option1: String, option2: String },

    /// An option was given without another option it depends on.
    #[error("{option} requires {required}.")]
    MissingDependency { option: String, required: String },

    /// An option was given a value outside of its accepted range.
    #[error("Invalid value for {option}: {reason}")]
    InvalidValue { option: String, reason: String },
}

/// Application-specific errors used throughout `githubdl`.
#[derive(Error, Debug)]
pub enum Error {
    /// The repository URL matches neither the SSH nor the HTTP(S) grammar.
    #[error("Repository url '{url}' is not http(s) or ssh")]
    InvalidUrlKind { url: String },

    /// No token was given as a parameter or found in the environment.
    #[error("Unable to find GitHub token either as a parameter or in the environment variable 'GITHUB_TOKEN'")]
    MissingCredential,

    /// Network-level failure (DNS, connection refused, timeout).
    #[error("Request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The API answered with a non-2xx status.
    #[error("GET query error for '{url}' (status {status}): {message}")]
    UpstreamApi {
        url: String,
        status: u16,
        message: String,
    },

    /// A directory listing was not an array of `{name, type}` objects.
    #[error("Unable to retrieve list of files from '{url}': {reason}")]
    MalformedListing { url: String, reason: String },

    /// A tags/branches response body was not valid JSON.
    #[error("Response from '{url}' is not valid JSON: {source}")]
    MalformedResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A remote name or submodule path would be written outside of the target root.
    #[error("Refusing to write outside of the target directory: '{path}'")]
    UnsafePath { path: String },

    /// Error occurring during file or directory creation or writes.
    #[error("I/O error accessing path '{path}': {source}")]
    Io {
        /// The path that caused the I/O error.
        path: String,
        /// The underlying `std::io::Error`.
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration settings or combinations.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The operation was cancelled by the user (e.g., Ctrl+C).
    #[error("Operation cancelled by user (Ctrl+C)")]
    Interrupted,
}

/// Result alias used by the library.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Helper function to create an `Error::Io` with path context.
pub fn io_error_with_path<P: AsRef<std::path::Path>>(source: std::io::Error, path: P) -> Error {
    Error::Io {
        path: path.as_ref().display().to_string(),
        source,
    }
}
