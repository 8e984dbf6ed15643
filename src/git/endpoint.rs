//! Builds GitHub REST API URLs for both github.com and GitHub Enterprise hosts.

use super::url::RepoIdentity;
use crate::constants::{GITHUB_API_HOST, GITHUB_HOST};
use std::fmt;

/// The repository API operation addressed by a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOperation {
    /// File bytes or a directory listing.
    Contents,
    /// The repository's tags.
    Tags,
    /// The repository's branches.
    Branches,
}

impl ApiOperation {
    /// The URL path segment for this operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiOperation::Contents => "contents",
            ApiOperation::Tags => "tags",
            ApiOperation::Branches => "branches",
        }
    }
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single API call, built fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest<'a> {
    pub identity: &'a RepoIdentity,
    pub relative_path: Option<&'a str>,
    pub reference: Option<&'a str>,
    pub operation: ApiOperation,
}

impl<'a> FetchRequest<'a> {
    /// A `contents` request for `relative_path`, optionally pinned to `reference`.
    pub fn contents(
        identity: &'a RepoIdentity,
        relative_path: &'a str,
        reference: Option<&'a str>,
    ) -> Self {
        Self {
            identity,
            relative_path: Some(relative_path),
            reference,
            operation: ApiOperation::Contents,
        }
    }

    /// A bare `tags` or `branches` style request.
    pub fn info(identity: &'a RepoIdentity, operation: ApiOperation) -> Self {
        Self {
            identity,
            relative_path: None,
            reference: None,
            operation,
        }
    }

    /// The full request URL.
    pub fn api_url(&self) -> String {
        build_api_url(
            self.identity,
            self.relative_path,
            self.reference,
            self.operation,
        )
    }
}

/// Builds the request URL for `operation` on the repository `identity`.
///
/// github.com (case-insensitive) is served from `https://api.github.com/repos/...`,
/// any other host from `https://<host>/api/v3/repos/...`. Empty strings count as
/// absent. When either the path or the reference is present, a `/` follows the
/// operation even if the path itself is empty.
///
/// # Examples
/// ```
/// use githubdl::git::{build_api_url, resolve, ApiOperation};
///
/// let id = resolve("https://github.com/zellij-org/zellij").unwrap();
/// assert_eq!(
///     build_api_url(&id, None, None, ApiOperation::Contents),
///     "https://api.github.com/repos/zellij-org/zellij/contents"
/// );
///
/// let id = resolve("git@git.enterprise.example:team/tool.git").unwrap();
/// assert_eq!(
///     build_api_url(&id, Some("docs/index.md"), Some("v1.0"), ApiOperation::Contents),
///     "https://git.enterprise.example/api/v3/repos/team/tool/contents/docs/index.md?ref=v1.0"
/// );
/// ```
pub fn build_api_url(
    identity: &RepoIdentity,
    relative_path: Option<&str>,
    reference: Option<&str>,
    operation: ApiOperation,
) -> String {
    let suffix = request_suffix(relative_path, reference);
    log::debug!(
        "repo: {} operation: {} request suffix: {}",
        identity.owner_repo,
        operation,
        suffix
    );

    if identity.host.eq_ignore_ascii_case(GITHUB_HOST) {
        format!(
            "https://{}/repos/{}/{}{}",
            GITHUB_API_HOST, identity.owner_repo, operation, suffix
        )
    } else {
        format!(
            "https://{}/api/v3/repos/{}/{}{}",
            identity.host, identity.owner_repo, operation, suffix
        )
    }
}

fn request_suffix(relative_path: Option<&str>, reference: Option<&str>) -> String {
    let path = relative_path.filter(|p| !p.is_empty());
    let reference = reference.filter(|r| !r.is_empty());

    if path.is_none() && reference.is_none() {
        return String::new();
    }

    let mut suffix = format!("/{}", path.unwrap_or_default().replace('\\', "/"));
    if let Some(reference) = reference {
        suffix.push_str("?ref=");
        suffix.push_str(reference);
    }
    suffix
}

#[cfg(test)]
mod tests {
    use super::*;

    fn github() -> RepoIdentity {
        RepoIdentity {
            host: "github.com".to_string(),
            owner_repo: "zellij-org/zellij".to_string(),
        }
    }

    fn enterprise() -> RepoIdentity {
        RepoIdentity {
            host: "git.enterprise.example".to_string(),
            owner_repo: "team/tool".to_string(),
        }
    }

    #[test]
    fn test_github_contents_without_path_or_ref() {
        let url = build_api_url(&github(), None, None, ApiOperation::Contents);
        assert_eq!(url, "https://api.github.com/repos/zellij-org/zellij/contents");
        assert!(!url.contains('?'));
        assert!(!url.ends_with('/'));
    }

    #[test]
    fn test_empty_strings_count_as_absent() {
        let url = build_api_url(&github(), Some(""), Some(""), ApiOperation::Contents);
        assert_eq!(url, "https://api.github.com/repos/zellij-org/zellij/contents");
    }

    #[test]
    fn test_github_host_is_case_insensitive() {
        let id = RepoIdentity {
            host: "GitHub.COM".to_string(),
            owner_repo: "a/b".to_string(),
        };
        assert_eq!(
            build_api_url(&id, None, None, ApiOperation::Tags),
            "https://api.github.com/repos/a/b/tags"
        );
    }

    #[test]
    fn test_path_and_reference() {
        assert_eq!(
            build_api_url(
                &github(),
                Some("xtask/Cargo.toml"),
                Some("v0.42.2"),
                ApiOperation::Contents
            ),
            "https://api.github.com/repos/zellij-org/zellij/contents/xtask/Cargo.toml?ref=v0.42.2"
        );
    }

    #[test]
    fn test_reference_only_keeps_leading_slash() {
        assert_eq!(
            build_api_url(&github(), None, Some("main"), ApiOperation::Contents),
            "https://api.github.com/repos/zellij-org/zellij/contents/?ref=main"
        );
    }

    #[test]
    fn test_enterprise_host() {
        assert_eq!(
            build_api_url(&enterprise(), Some("src"), Some("abc123"), ApiOperation::Contents),
            "https://git.enterprise.example/api/v3/repos/team/tool/contents/src?ref=abc123"
        );
        assert_eq!(
            FetchRequest::info(&enterprise(), ApiOperation::Branches).api_url(),
            "https://git.enterprise.example/api/v3/repos/team/tool/branches"
        );
    }

    #[test]
    fn test_backslashes_are_normalised() {
        assert_eq!(
            build_api_url(&github(), Some(r"xtask\src\main.rs"), None, ApiOperation::Contents),
            "https://api.github.com/repos/zellij-org/zellij/contents/xtask/src/main.rs"
        );
    }

    #[test]
    fn test_contents_request_builder() {
        let id = github();
        let request = FetchRequest::contents(&id, "xtask", None);
        assert_eq!(request.operation, ApiOperation::Contents);
        assert_eq!(
            request.api_url(),
            "https://api.github.com/repos/zellij-org/zellij/contents/xtask"
        );
    }
}
