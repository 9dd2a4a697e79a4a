//! Shared indexing state, written by the daemon loop and read by IPC.

use std::sync::{Arc, RwLock};

/// Point-in-time view of the daemon's indexing progress.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct IndexingSnapshot {
    pub is_indexing: bool,
    /// In [0, 1]; pinned to 1.0 whenever the daemon is idle after its first
    /// scan.
    pub progress: f64,
    pub apps_count: i32,
}

/// Single-writer, many-reader indexing state machine.
///
/// Snapshot reads are side-effect free and safe from any thread. Progress is
/// clamped to [0, 1] and never decreases within one scan.
#[derive(Clone, Debug, Default)]
pub struct IndexingState {
    inner: Arc<RwLock<IndexingSnapshot>>,
}

impl IndexingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan started: progress resets to zero.
    pub fn begin_scan(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.is_indexing = true;
        inner.progress = 0.0;
    }

    /// Mid-scan progress update. A value that would move backwards while a
    /// scan is running is ignored.
    pub fn set_progress(&self, progress: f64, apps_count: i32) {
        let mut inner = self.inner.write().unwrap();
        let progress = progress.clamp(0.0, 1.0);
        if inner.is_indexing && progress < inner.progress {
            return;
        }
        inner.progress = progress;
        inner.apps_count = apps_count;
    }

    /// Scan finished, successfully or not: back to idle with progress pinned
    /// to 1.0.
    pub fn finish_scan(&self, apps_count: i32) {
        let mut inner = self.inner.write().unwrap();
        inner.is_indexing = false;
        inner.progress = 1.0;
        inner.apps_count = apps_count;
    }

    pub fn snapshot(&self) -> IndexingSnapshot {
        *self.inner.read().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_cycle_transitions() {
        let state = IndexingState::new();
        assert!(!state.snapshot().is_indexing);

        state.begin_scan();
        let snap = state.snapshot();
        assert!(snap.is_indexing);
        assert_eq!(snap.progress, 0.0);

        state.set_progress(0.8, 42);
        assert_eq!(state.snapshot().progress, 0.8);

        state.finish_scan(42);
        let snap = state.snapshot();
        assert!(!snap.is_indexing);
        assert_eq!(snap.progress, 1.0);
        assert_eq!(snap.apps_count, 42);
    }

    #[test]
    fn progress_never_decreases_within_a_scan() {
        let state = IndexingState::new();
        state.begin_scan();
        state.set_progress(0.6, 10);
        state.set_progress(0.3, 5);
        assert_eq!(state.snapshot().progress, 0.6);
        assert_eq!(state.snapshot().apps_count, 10);
    }

    #[test]
    fn progress_resets_on_next_scan() {
        let state = IndexingState::new();
        state.begin_scan();
        state.finish_scan(7);
        assert_eq!(state.snapshot().progress, 1.0);

        state.begin_scan();
        assert_eq!(state.snapshot().progress, 0.0);
        assert!(state.snapshot().is_indexing);
    }

    #[test]
    fn progress_is_clamped() {
        let state = IndexingState::new();
        state.begin_scan();
        state.set_progress(7.5, 1);
        assert_eq!(state.snapshot().progress, 1.0);
    }
}
