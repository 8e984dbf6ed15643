// src/git/mod.rs
//! Resolves repository URLs and downloads content through the GitHub REST API.
//!
//! This module provides functionality to:
//! - Parse SSH and HTTP(S) repository URLs into a host and `owner/repo` path.
//! - Build API URLs for github.com and GitHub Enterprise hosts.
//! - Fetch raw files, directory listings and repository metadata using `reqwest`.
//! - Mirror directory trees to disk, expanding `.gitmodules` submodules on request.

// Declare the sub-modules.
mod download;
mod endpoint;
mod fetch;
mod submodules;
mod url;

// Re-export the public-facing API.
pub use download::{DownloadSummary, DownloadTask, Downloader};
pub use endpoint::{build_api_url, ApiOperation, FetchRequest};
pub use fetch::{ContentFetcher, DirEntry, EntryKind, HttpResponse, HttpTransport, Transport};
pub use submodules::{parse_gitmodules, GitmoduleEntry};
pub use url::{classify, resolve, RepoIdentity, UrlForm};
