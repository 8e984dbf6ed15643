// src/git/download.rs
//! Mirrors files and directory trees from the GitHub Contents API to disk.

use super::endpoint::{ApiOperation, FetchRequest};
use super::fetch::{ContentFetcher, EntryKind};
use super::submodules::{parse_gitmodules, GitmoduleEntry};
use super::url::{resolve, RepoIdentity};
use crate::cancellation::CancellationToken;
use crate::constants::GITMODULES_FILE;
use crate::errors::{io_error_with_path, ConfigError, Error, Result};
use crate::progress::{NoOpProgress, ProgressReporter};
use rayon::prelude::*;
use std::fs;
use std::ops::Add;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Counters accumulated over a directory download.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Files written to disk.
    pub files: usize,
    /// Remote directories listed (including the starting directory).
    pub directories: usize,
    /// Total bytes written.
    pub bytes: u64,
    /// Submodules expanded.
    pub submodules: usize,
}

impl Add for DownloadSummary {
    type Output = DownloadSummary;

    fn add(self, rhs: Self) -> Self {
        DownloadSummary {
            files: self.files + rhs.files,
            directories: self.directories + rhs.directories,
            bytes: self.bytes + rhs.bytes,
            submodules: self.submodules + rhs.submodules,
        }
    }
}

/// One level of a recursive directory download.
///
/// Every descent into a subdirectory or a submodule creates a new task that owns
/// its paths; nothing is shared between sibling tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    /// Repository being walked.
    pub identity: RepoIdentity,
    /// Repository-relative directory, `/`-separated, without surrounding slashes.
    /// Empty for the repository root.
    pub base_path: String,
    /// Local directory the repository-relative layout is mirrored under.
    pub target_root: PathBuf,
    /// Branch, tag or commit to read from; `None` for the default branch.
    pub reference: Option<String>,
    /// Whether `.gitmodules` files are expanded.
    pub submodules: bool,
    /// Repositories entered on the way to this task, outermost first.
    lineage: Vec<RepoIdentity>,
}

impl DownloadTask {
    /// Creates the root task of a download.
    ///
    /// # Errors
    /// [`Error::UnsafePath`] when `base_path` contains a `..` segment.
    pub fn new(
        identity: RepoIdentity,
        base_path: &str,
        target_root: impl Into<PathBuf>,
        reference: Option<String>,
        submodules: bool,
    ) -> Result<Self> {
        Ok(Self {
            lineage: vec![identity.clone()],
            identity,
            base_path: normalize_repo_path(base_path)?,
            target_root: target_root.into(),
            reference: reference.filter(|r| !r.is_empty()),
            submodules,
        })
    }

    /// The task for the subdirectory `name` of this task.
    fn child(&self, name: &str) -> Self {
        Self {
            base_path: self.repo_path(name),
            ..self.clone()
        }
    }

    /// The task for a submodule rooted at `target_root`. Submodules are read at
    /// their default branch and always expand their own submodules.
    fn submodule(&self, identity: RepoIdentity, target_root: PathBuf) -> Self {
        let mut lineage = self.lineage.clone();
        lineage.push(identity.clone());
        Self {
            identity,
            base_path: String::new(),
            target_root,
            reference: None,
            submodules: true,
            lineage,
        }
    }

    /// Whether `identity` is this repository or one of the repositories it is nested in.
    pub fn is_within(&self, identity: &RepoIdentity) -> bool {
        self.lineage.contains(identity)
    }

    fn repo_path(&self, name: &str) -> String {
        if self.base_path.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.base_path, name)
        }
    }

    /// `target_root / base_path`, keeping the source directory names in the mirror.
    pub fn local_dir(&self) -> PathBuf {
        self.base_path
            .split('/')
            .filter(|s| !s.is_empty())
            .fold(self.target_root.clone(), |dir, segment| dir.join(segment))
    }
}

/// Downloads files, directory trees and repository metadata.
///
/// Sibling entries of a listing are processed in parallel on a dedicated thread
/// pool whose size caps the number of requests in flight. The first failure stops
/// new siblings from being scheduled; requests already running finish, and the
/// failure is returned. Files written before the failure stay on disk.
pub struct Downloader {
    fetcher: ContentFetcher,
    pool: rayon::ThreadPool,
    cancel: CancellationToken,
    progress: Arc<dyn ProgressReporter>,
}

impl Downloader {
    /// Creates a downloader issuing at most `jobs` concurrent requests.
    pub fn new(fetcher: ContentFetcher, jobs: usize) -> Result<Self> {
        if jobs == 0 {
            return Err(ConfigError::InvalidValue {
                option: "--jobs".to_string(),
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .thread_name(|i| format!("githubdl-worker-{}", i))
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                option: "--jobs".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            fetcher,
            pool,
            cancel: CancellationToken::new(),
            progress: Arc::new(NoOpProgress),
        })
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Downloads a single file.
    ///
    /// Without a `target` the file is written to the current directory under its
    /// base name (`.cargo/config.toml` becomes `config.toml`). An explicit target is
    /// the full destination path; missing parent directories are created.
    ///
    /// # Returns
    /// The path the file was written to.
    pub fn download_file(
        &self,
        repo_url: &str,
        file_path: &str,
        target: Option<&Path>,
        reference: Option<&str>,
    ) -> Result<PathBuf> {
        self.ensure_not_cancelled()?;
        let identity = resolve(repo_url)?;
        let repo_path = normalize_repo_path(file_path)?;

        let local_path = match target {
            Some(target) => target.to_path_buf(),
            None => default_file_target(file_path)?,
        };

        let url = FetchRequest::contents(&identity, &repo_path, reference).api_url();
        log::info!("Requesting file: {} at url: {}", repo_path, url);
        let bytes = self.fetcher.fetch_raw(&url)?;

        if let Some(parent) = local_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_directory(parent)?;
        }
        write_file(&local_path, &bytes)?;
        self.progress.inc(1);
        Ok(local_path)
    }

    /// Recursively downloads the directory `base_path` of the repository at `repo_url`.
    ///
    /// Files land at `target_root / base_path / ...` (`target_root` defaults to the
    /// current directory), so downloading `xtask` into `out` produces `out/xtask/...`.
    /// With `submodules` set, every `.gitmodules` file found is parsed and each
    /// submodule is downloaded into `target_root / <submodule path>`.
    pub fn download_directory(
        &self,
        repo_url: &str,
        base_path: &str,
        target_root: Option<&Path>,
        reference: Option<&str>,
        submodules: bool,
    ) -> Result<DownloadSummary> {
        let identity = resolve(repo_url)?;
        let task = DownloadTask::new(
            identity,
            base_path,
            target_root.unwrap_or_else(|| Path::new(".")),
            reference.map(str::to_string),
            submodules,
        )?;
        self.run_task(task)
    }

    /// Runs a prepared [`DownloadTask`] to completion on the worker pool.
    pub fn run_task(&self, task: DownloadTask) -> Result<DownloadSummary> {
        let summary = self.pool.install(|| self.walk(&task))?;
        log::info!(
            "Downloaded {} files ({} bytes) from {} directories and {} submodules",
            summary.files,
            summary.bytes,
            summary.directories,
            summary.submodules
        );
        Ok(summary)
    }

    /// Fetches a repository-level JSON document such as the tag or branch list.
    pub fn fetch_repo_info(
        &self,
        repo_url: &str,
        operation: ApiOperation,
    ) -> Result<serde_json::Value> {
        self.ensure_not_cancelled()?;
        let identity = resolve(repo_url)?;
        let url = FetchRequest::info(&identity, operation).api_url();
        log::info!("Requesting repository {} at url: {}", operation, url);
        self.fetcher.fetch_json(&url)
    }

    pub fn list_tags(&self, repo_url: &str) -> Result<serde_json::Value> {
        self.fetch_repo_info(repo_url, ApiOperation::Tags)
    }

    pub fn list_branches(&self, repo_url: &str) -> Result<serde_json::Value> {
        self.fetch_repo_info(repo_url, ApiOperation::Branches)
    }

    fn walk(&self, task: &DownloadTask) -> Result<DownloadSummary> {
        self.ensure_not_cancelled()?;
        let url =
            FetchRequest::contents(&task.identity, &task.base_path, task.reference.as_deref())
                .api_url();
        log::info!(
            "Retrieving a list of files for directory: {}/{}",
            task.identity,
            task.base_path
        );
        let entries = self.fetcher.fetch_json_listing(&url)?;
        create_directory(&task.local_dir())?;

        let below = entries
            .par_iter()
            .map(|entry| match entry.kind {
                EntryKind::Dir => self.walk(&task.child(&entry.name)),
                EntryKind::File => self.download_entry(task, &entry.name),
            })
            .try_reduce(DownloadSummary::default, |a, b| Ok(a + b))?;

        Ok(below
            + DownloadSummary {
                directories: 1,
                ..Default::default()
            })
    }

    fn download_entry(&self, task: &DownloadTask, name: &str) -> Result<DownloadSummary> {
        self.ensure_not_cancelled()?;
        let repo_path = task.repo_path(name);
        let url = FetchRequest::contents(&task.identity, &repo_path, task.reference.as_deref())
            .api_url();
        log::debug!("Requesting file: {} at url: {}", repo_path, url);
        let bytes = self.fetcher.fetch_raw(&url)?;

        let local_dir = task.local_dir();
        create_directory(&local_dir)?;
        write_file(&local_dir.join(name), &bytes)?;
        self.progress.inc(1);
        self.progress.set_message(repo_path);

        let written = DownloadSummary {
            files: 1,
            bytes: bytes.len() as u64,
            ..Default::default()
        };

        if task.submodules && name.to_lowercase().ends_with(GITMODULES_FILE) {
            let text = String::from_utf8_lossy(&bytes);
            let nested = parse_gitmodules(&text)
                .par_iter()
                .map(|module| self.download_submodule(task, module))
                .try_reduce(DownloadSummary::default, |a, b| Ok(a + b))?;
            return Ok(written + nested);
        }
        Ok(written)
    }

    fn download_submodule(
        &self,
        task: &DownloadTask,
        module: &GitmoduleEntry,
    ) -> Result<DownloadSummary> {
        let identity = match task.identity.join_relative(&module.url) {
            Some(identity) => identity,
            None => resolve(&module.url)?,
        };

        if task.is_within(&identity) {
            log::warn!(
                "Skipping submodule '{}': {} is already being downloaded further up",
                module.path,
                identity
            );
            return Ok(DownloadSummary::default());
        }

        let target_root = join_relative_path(&task.target_root, &module.path)?;
        create_directory(&target_root)?;
        log::info!("Downloading submodule {} into {}", identity, target_root.display());

        let nested = self.walk(&task.submodule(identity, target_root))?;
        Ok(nested
            + DownloadSummary {
                submodules: 1,
                ..Default::default()
            })
    }

    fn ensure_not_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(Error::Interrupted);
        }
        Ok(())
    }
}

/// Normalises a repository path: `\` becomes `/`, empty and `.` segments are
/// dropped, so `/` and `` both denote the repository root.
fn normalize_repo_path(path: &str) -> Result<String> {
    let normalized = path.replace('\\', "/");
    let mut segments = Vec::new();
    for segment in normalized.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                return Err(Error::UnsafePath {
                    path: path.to_string(),
                })
            }
            other => segments.push(other),
        }
    }
    Ok(segments.join("/"))
}

/// The local path of a file downloaded without a target: its base name, relative
/// to the current directory.
fn default_file_target(file_path: &str) -> Result<PathBuf> {
    let repo_path = normalize_repo_path(file_path)?;
    match repo_path.rsplit('/').next().filter(|s| !s.is_empty()) {
        Some(name) => Ok(PathBuf::from(name)),
        None => Err(ConfigError::InvalidValue {
            option: "--file".to_string(),
            reason: format!("'{}' does not name a file", file_path),
        }
        .into()),
    }
}

/// Joins a submodule path below `root`, refusing absolute paths and `..` segments.
fn join_relative_path(root: &Path, relative: &str) -> Result<PathBuf> {
    let unsafe_path = || Error::UnsafePath {
        path: relative.to_string(),
    };
    if relative.starts_with('/') || relative.starts_with('\\') || Path::new(relative).has_root() {
        return Err(unsafe_path());
    }
    let normalized = normalize_repo_path(relative)?;
    if normalized.is_empty() {
        return Err(unsafe_path());
    }
    Ok(normalized
        .split('/')
        .fold(root.to_path_buf(), |dir, segment| dir.join(segment)))
}

/// Creates `dir` and its parents; an existing directory is not an error.
fn create_directory(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    log::info!("Creating directory: {}", dir.display());
    fs::create_dir_all(dir).map_err(|e| io_error_with_path(e, dir))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    log::info!("Writing to file: {}", path.display());
    fs::write(path, bytes).map_err(|e| io_error_with_path(e, path))
}
