//! Extracts submodule declarations from `.gitmodules` content.

use once_cell::sync::Lazy;
use regex::Regex;

static PATH_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*path\s*=\s*(.*?)\s*$").expect("valid path line regex"));
static URL_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*url\s*=\s*(.*?)\s*$").expect("valid url line regex"));

/// One `[submodule]` block: where it is checked out and where it comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitmoduleEntry {
    pub path: String,
    pub url: String,
}

/// Parses `.gitmodules` text into `(path, url)` pairs in textual order.
///
/// Section headers are not parsed. A pair is emitted as soon as both a `path =`
/// and a `url =` line have been seen since the previous pair, which separates
/// consecutive blocks. Other lines are ignored, and an incomplete trailing block
/// is dropped.
///
/// # Examples
/// ```
/// use githubdl::git::parse_gitmodules;
///
/// let text = "[submodule \"vendor/lib\"]\n\tpath = vendor/lib\n\turl = https://github.com/org/lib.git\n";
/// let entries = parse_gitmodules(text);
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].path, "vendor/lib");
/// assert_eq!(entries[0].url, "https://github.com/org/lib.git");
/// ```
pub fn parse_gitmodules(text: &str) -> Vec<GitmoduleEntry> {
    let mut entries = Vec::new();
    let mut path: Option<String> = None;
    let mut url: Option<String> = None;

    for line in text.lines() {
        if path.is_none() {
            path = PATH_LINE_RE.captures(line).map(|c| c[1].to_string());
        }
        if url.is_none() {
            url = URL_LINE_RE.captures(line).map(|c| c[1].to_string());
        }
        if path.is_some() && url.is_some() {
            if let (Some(path), Some(url)) = (path.take(), url.take()) {
                entries.push(GitmoduleEntry { path, url });
            }
        }
    }

    if path.is_some() || url.is_some() {
        log::debug!("Ignoring incomplete trailing submodule block");
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, url: &str) -> GitmoduleEntry {
        GitmoduleEntry {
            path: path.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_two_blocks_in_order() {
        let text = r#"[submodule "alpha"]
	path = libs/alpha
	url = https://github.com/org/alpha.git
[submodule "beta"]
	path = libs/beta
	branch = main
	url = git@github.com:org/beta.git
"#;
        assert_eq!(
            parse_gitmodules(text),
            vec![
                entry("libs/alpha", "https://github.com/org/alpha.git"),
                entry("libs/beta", "git@github.com:org/beta.git"),
            ]
        );
    }

    #[test]
    fn test_url_before_path_and_loose_whitespace() {
        let text = "[submodule \"x\"]\n   url=https://github.com/org/x\npath   =   deps/x   \n";
        assert_eq!(
            parse_gitmodules(text),
            vec![entry("deps/x", "https://github.com/org/x")]
        );
    }

    #[test]
    fn test_incomplete_trailing_block_is_dropped() {
        let text = "path = a\nurl = https://github.com/org/a\npath = b\n";
        assert_eq!(
            parse_gitmodules(text),
            vec![entry("a", "https://github.com/org/a")]
        );
    }

    #[test]
    fn test_unrelated_keys_do_not_match() {
        let text = "fetchRecurseSubmodules = true\npushurl = nope\nsubpath = nope\n";
        assert!(parse_gitmodules(text).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_gitmodules("").is_empty());
    }
}
