//! Thread-safe effect counters for history operations.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time copy of all seven counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Nodes written
    pub writes: u64,
    /// Successful single-step undos
    pub undos: u64,
    /// Successful redos
    pub redos: u64,
    /// Rewinds that moved the head
    pub undo_to_root: u64,
    /// Pause checkpoints taken
    pub pauses: u64,
    /// Resumes that jumped to a checkpoint
    pub resumes: u64,
    /// Calls discarding the checkpoint
    pub clear_paused: u64,
}

/// Counters updated by [`ObservingHistory`](super::ObservingHistory).
///
/// Counters are atomics so a telemetry thread can read them, usually through
/// an `Arc<HistoryMetrics>`, while a single owner mutates the history.
#[derive(Debug, Default)]
pub struct HistoryMetrics {
    writes: AtomicU64,
    undos: AtomicU64,
    redos: AtomicU64,
    undo_to_root: AtomicU64,
    pauses: AtomicU64,
    resumes: AtomicU64,
    clear_paused: AtomicU64,
}

impl HistoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn increment_writes(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn increment_undos(&self) {
        self.undos.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn increment_redos(&self) {
        self.redos.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn increment_undo_to_root(&self) {
        self.undo_to_root.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn increment_pauses(&self) {
        self.pauses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn increment_resumes(&self) {
        self.resumes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn increment_clear_paused(&self) {
        self.clear_paused.fetch_add(1, Ordering::Relaxed);
    }

    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    pub fn undo_count(&self) -> u64 {
        self.undos.load(Ordering::Relaxed)
    }

    pub fn redo_count(&self) -> u64 {
        self.redos.load(Ordering::Relaxed)
    }

    pub fn undo_to_root_count(&self) -> u64 {
        self.undo_to_root.load(Ordering::Relaxed)
    }

    pub fn pause_count(&self) -> u64 {
        self.pauses.load(Ordering::Relaxed)
    }

    pub fn resume_count(&self) -> u64 {
        self.resumes.load(Ordering::Relaxed)
    }

    pub fn clear_paused_count(&self) -> u64 {
        self.clear_paused.load(Ordering::Relaxed)
    }

    /// Read every counter for reporting.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            writes: self.write_count(),
            undos: self.undo_count(),
            redos: self.redo_count(),
            undo_to_root: self.undo_to_root_count(),
            pauses: self.pause_count(),
            resumes: self.resume_count(),
            clear_paused: self.clear_paused_count(),
        }
    }
}
