// src/progress.rs

//! Defines a trait for reporting progress of long-running downloads.
#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "progress")]
use std::time::Duration;

/// A trait for reporting progress, abstracting over specific implementations like `indicatif`.
///
/// The total number of files in a remote tree is unknown until the walk ends, so
/// reporters count upwards instead of tracking a fixed length.
///
/// # Examples
///
/// ```
/// use githubdl::progress::ProgressReporter;
/// use std::sync::atomic::{AtomicU64, Ordering};
///
/// struct Counter(AtomicU64);
///
/// impl ProgressReporter for Counter {
///     fn inc(&self, delta: u64) {
///         self.0.fetch_add(delta, Ordering::SeqCst);
///     }
///     fn set_message(&self, _msg: String) {}
///     fn finish_with_message(&self, _msg: String) {}
/// }
///
/// let reporter = Counter(AtomicU64::new(0));
/// reporter.inc(2);
/// assert_eq!(reporter.0.load(Ordering::SeqCst), 2);
/// ```
pub trait ProgressReporter: Send + Sync {
    /// Records `delta` more completed downloads.
    fn inc(&self, delta: u64);
    /// Sets a descriptive message for the current operation.
    fn set_message(&self, msg: String);
    /// Finishes the progress reporting with a final message.
    fn finish_with_message(&self, msg: String);
}

/// A `ProgressReporter` that does nothing.
///
/// Used when stderr is not a terminal or the `progress` feature is disabled.
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish_with_message(&self, _msg: String) {}
}

/// An implementation of `ProgressReporter` using an `indicatif` spinner.
#[cfg(feature = "progress")]
#[derive(Clone)]
pub struct IndicatifProgress {
    bar: ProgressBar,
}

#[cfg(feature = "progress")]
impl IndicatifProgress {
    /// Creates a new spinner with a default style.
    pub fn new() -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} files {msg}")
        {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(120));
        Self { bar: pb }
    }
}

#[cfg(feature = "progress")]
impl Default for IndicatifProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "progress")]
impl ProgressReporter for IndicatifProgress {
    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish_with_message(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}
