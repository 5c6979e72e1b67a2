//! Concurrent directory tree builder
//!
//! Two-tier scheduling: the [`Scanner`] fans each immediate subdirectory of
//! the scan root out to a bounded pool of worker threads, and every worker
//! walks its whole subtree with plain synchronous recursion
//! ([`walk_single`]). Workers never submit work back to the pool, so the
//! pool can never deadlock on its own queue.
//!
//! ```text
//! Scanner (root readdir)
//! │
//! ├── immediate file  → leaf Node, folded inline
//! ├── immediate dir A → worker 0: walk_single(A)   (serial recursion)
//! ├── immediate dir B → worker 1: walk_single(B)
//! └── immediate dir C → worker 0: walk_single(C)
//! │
//! └── collect unit outcomes (completion order) → aggregate → root Node
//! ```

mod scanner;
mod single;

pub use scanner::Scanner;
pub use single::{probe, walk_single};

use std::sync::atomic::{AtomicU64, Ordering};

/// Running counters shared between the scanner, its workers, and the
/// progress display.
///
/// Observability only: tree totals come from [`crate::tree::aggregate`],
/// never from here, so disabling progress cannot change results.
#[derive(Debug, Default)]
pub struct ScanStats {
    dirs: AtomicU64,
    files: AtomicU64,
    bytes: AtomicU64,
    errors: AtomicU64,
}

impl ScanStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_dir(&self) {
        self.dirs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_file(&self, size: u64) {
        self.files.fetch_add(1, Ordering::Relaxed);
        self.bytes.fetch_add(size, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Consistent-enough point-in-time view for display
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            dirs: self.dirs.load(Ordering::Relaxed),
            files: self.files.load(Ordering::Relaxed),
            bytes: self.bytes.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of [`ScanStats`]
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsSnapshot {
    pub dirs: u64,
    pub files: u64,
    pub bytes: u64,
    pub errors: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_accumulate() {
        let stats = ScanStats::new();
        stats.record_dir();
        stats.record_file(100);
        stats.record_file(250);
        stats.record_error();

        let snap = stats.snapshot();
        assert_eq!(snap.dirs, 1);
        assert_eq!(snap.files, 2);
        assert_eq!(snap.bytes, 350);
        assert_eq!(snap.errors, 1);
    }
}
