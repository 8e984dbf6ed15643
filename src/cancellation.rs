//! Provides a token-based mechanism for graceful cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A token that can be used to signal cancellation to a running download.
///
/// This struct is a cloneable, thread-safe wrapper around an `Arc<AtomicBool>`.
/// The directory walker checks it before every request, so cancelling stops new
/// requests from being issued while requests already in flight finish.
///
/// # Examples
///
/// ```
/// use githubdl::CancellationToken;
///
/// let token = CancellationToken::new();
/// let worker_view = token.clone();
/// assert!(!worker_view.is_cancelled());
///
/// token.cancel();
/// assert!(worker_view.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    inner: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Creates a new `CancellationToken` in a non-cancelled state.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Signals cancellation to this token and all of its clones.
    pub fn cancel(&self) {
        self.inner.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once `cancel()` has been called on this token or any clone.
    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::Relaxed)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
