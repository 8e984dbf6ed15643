//! Handles parsing of git repository URLs into a host and an owner/repo path.

use crate::errors::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use url::Url;

/// `git@<host>:<owner>/<repo>.git`
static SSH_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^git@([^:]+):(.+)\.git$").expect("valid ssh url regex"));

/// `http://...` or `https://...`
static HTTP_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://.*$").expect("valid http url regex"));

/// The canonical identity of a repository on a GitHub(-Enterprise) host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoIdentity {
    /// The DNS-style authority, e.g. `github.com` or `git.example.com:8443`.
    pub host: String,
    /// `<owner>/<repo>` without surrounding slashes or a `.git` suffix.
    pub owner_repo: String,
}

impl RepoIdentity {
    /// Resolves a submodule URL that is relative to this repository
    /// (`./sibling.git`, `../other/repo.git`).
    ///
    /// Returns `None` when `relative` is not a relative URL or climbs above the host root.
    ///
    /// # Examples
    /// ```
    /// use githubdl::git::resolve;
    ///
    /// let parent = resolve("https://github.com/org/app").unwrap();
    /// let lib = parent.join_relative("../lib.git").unwrap();
    /// assert_eq!(lib.host, "github.com");
    /// assert_eq!(lib.owner_repo, "org/lib");
    /// ```
    pub fn join_relative(&self, relative: &str) -> Option<RepoIdentity> {
        if !(relative.starts_with("./") || relative.starts_with("../")) {
            return None;
        }

        // Git resolves relative submodule URLs against the superproject URL itself,
        // so `../x` replaces the repository name and `./x` nests below it.
        let mut segments: Vec<&str> = self.owner_repo.split('/').collect();
        for part in relative.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    segments.pop()?;
                }
                other => segments.push(other),
            }
        }

        let joined = segments.join("/");
        let owner_repo = joined.strip_suffix(".git").unwrap_or(&joined);
        if owner_repo.is_empty() {
            return None;
        }
        Some(RepoIdentity {
            host: self.host.clone(),
            owner_repo: owner_repo.to_string(),
        })
    }
}

impl fmt::Display for RepoIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.host, self.owner_repo)
    }
}

/// The grammar a repository URL was recognised as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlForm {
    /// `http(s)://<host>/<owner>/<repo>[.git]`
    Http { host: String, owner_repo: String },
    /// `git@<host>:<owner>/<repo>.git`
    Ssh { host: String, owner_repo: String },
    /// Neither grammar matched.
    Invalid,
}

/// Classifies a repository URL and extracts its components.
///
/// The SSH form is tried first; it requires the literal `git@` user, so strings such
/// as `giti_@github.com:pypa/sampleproject.git` are `Invalid`. `ssh://` URLs are not
/// supported.
///
/// # Examples
/// ```
/// use githubdl::git::{classify, UrlForm};
///
/// assert_eq!(
///     classify("git@github.com:pypa/sampleproject.git"),
///     UrlForm::Ssh {
///         host: "github.com".to_string(),
///         owner_repo: "pypa/sampleproject".to_string(),
///     }
/// );
/// assert_eq!(classify("htp://test.com"), UrlForm::Invalid);
/// ```
pub fn classify(repo_url: &str) -> UrlForm {
    if let Some(caps) = SSH_URL_RE.captures(repo_url) {
        return UrlForm::Ssh {
            host: caps[1].to_string(),
            owner_repo: caps[2].trim_matches('/').to_string(),
        };
    }

    if HTTP_URL_RE.is_match(repo_url) {
        let Ok(parsed) = Url::parse(repo_url) else {
            return UrlForm::Invalid;
        };
        let Some(host) = parsed.host_str() else {
            return UrlForm::Invalid;
        };
        let host = match parsed.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let path = parsed.path().trim_matches('/');
        let owner_repo = path.strip_suffix(".git").unwrap_or(path);
        return UrlForm::Http {
            host,
            owner_repo: owner_repo.trim_end_matches('/').to_string(),
        };
    }

    UrlForm::Invalid
}

/// Resolves a repository URL into its [`RepoIdentity`].
///
/// # Errors
/// Returns [`Error::InvalidUrlKind`] when the URL matches neither grammar, or when
/// an HTTP(S) URL carries no owner/repo path.
///
/// # Examples
/// ```
/// use githubdl::git::resolve;
///
/// let id = resolve("https://github.com/zellij-org/zellij.git").unwrap();
/// assert_eq!(id.host, "github.com");
/// assert_eq!(id.owner_repo, "zellij-org/zellij");
///
/// assert!(resolve("httpxx://test.com").is_err());
/// ```
pub fn resolve(repo_url: &str) -> Result<RepoIdentity> {
    match classify(repo_url) {
        UrlForm::Ssh { host, owner_repo } | UrlForm::Http { host, owner_repo }
            if !host.is_empty() && !owner_repo.is_empty() =>
        {
            Ok(RepoIdentity { host, owner_repo })
        }
        _ => {
            log::error!("Repository url '{}' is not http(s) or ssh", repo_url);
            Err(Error::InvalidUrlKind {
                url: repo_url.to_string(),
            })
        }
    }
}
