// src/constants.rs

/// The public SaaS host. Any other host is treated as GitHub Enterprise.
pub const GITHUB_HOST: &str = "github.com";

/// API host serving requests for repositories on [`GITHUB_HOST`].
pub const GITHUB_API_HOST: &str = "api.github.com";

/// Environment variable the token is read from when not passed explicitly.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Media type asking the contents API for raw file bytes.
pub const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";

/// User-Agent header sent with every request (required by the GitHub API).
pub const USER_AGENT: &str = concat!("githubdl/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default cap on concurrently in-flight requests.
pub const DEFAULT_JOBS: usize = 4;

/// Name of the submodule declaration file.
pub const GITMODULES_FILE: &str = ".gitmodules";

/// Output file for the tags operation, relative to the working directory.
pub const TAGS_FILE: &str = "tags.json";

/// Output file for the branches operation, relative to the working directory.
pub const BRANCHES_FILE: &str = "branches.json";
