//! Bounded fan-out over the scan root's immediate subdirectories
//!
//! The [`Scanner`] owns the concurrency boundary: it is the only code that
//! dispatches to the worker pool, and each dispatched unit runs
//! [`walk_single`] to completion with no further pool interaction. Results
//! are folded in completion order; summation is commutative, so totals are
//! deterministic regardless of which worker finishes first.

use crate::config::ScanConfig;
use crate::error::{EntryError, Result, ScanError};
use crate::progress::Progress;
use crate::tree::Node;
use crate::walker::{probe, walk_single, ScanStats, StatsSnapshot};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::HashMap;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// One dispatched walk of a top-level subdirectory
struct DirWork {
    path: PathBuf,
}

/// What a worker sends back for one dispatched unit
enum UnitOutcome {
    /// The subtree was walked to completion
    Built(Node),

    /// The subtree contributes nothing; already warned at the failure site
    Absent,

    /// The worker panicked while walking this subtree
    Failed { path: PathBuf, message: String },
}

/// Concurrent tree builder for one scan root
pub struct Scanner {
    config: ScanConfig,
    shutdown: Arc<AtomicBool>,
    stats: Arc<ScanStats>,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            shutdown: Arc::new(AtomicBool::new(false)),
            stats: Arc::new(ScanStats::new()),
        }
    }

    /// Flag checked before each dispatch and before each queued unit starts;
    /// wire this to the signal handler
    pub fn shutdown_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Point-in-time view of the walk counters
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Scan with a live progress readout refreshed every 100 ms.
    ///
    /// The monitor thread only loads counters and writes to the spinner; it
    /// never feeds back into scanning.
    pub fn run(&self, progress: &Progress) -> Result<Node> {
        let done = Arc::new(AtomicBool::new(false));

        let monitor = {
            let done = Arc::clone(&done);
            let stats = Arc::clone(&self.stats);
            let progress = progress.clone();
            thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    progress.update(&stats.snapshot());
                    thread::sleep(Duration::from_millis(100));
                }
            })
        };

        let result = self.scan(progress);

        done.store(true, Ordering::SeqCst);
        let _ = monitor.join();

        result
    }

    /// Build the tree for the configured root.
    ///
    /// The root itself is stat'ed *following* symlinks, so pointing the tool
    /// at a symlink to a directory scans that directory; every entry found
    /// during traversal uses the non-following [`probe`].
    fn scan(&self, progress: &Progress) -> Result<Node> {
        let root = self.config.root.clone();

        if self.shutdown.load(Ordering::Relaxed) {
            return Err(ScanError::Interrupted);
        }

        info!(
            "Scanning {} with {} workers",
            root.display(),
            self.config.workers
        );

        let meta = match fs::metadata(&root) {
            Ok(meta) => meta,
            Err(source) => {
                // Root vanished between the CLI existence check and the scan
                self.stats.record_error();
                progress.warn(
                    &EntryError::StatFailed {
                        path: root.clone(),
                        source,
                    }
                    .to_string(),
                );
                return Ok(Node::empty_dir(root));
            }
        };

        // User pointed the tool at a single file: no workers at all
        if !meta.is_dir() {
            self.stats.record_file(meta.len());
            return Ok(Node::file(root, meta.len()));
        }

        let entries = match fs::read_dir(&root) {
            Ok(entries) => entries,
            Err(source) => {
                self.stats.record_error();
                progress.warn(
                    &EntryError::ReadDirFailed {
                        path: root.clone(),
                        source,
                    }
                    .to_string(),
                );
                return Ok(Node::empty_dir(root));
            }
        };

        let (work_tx, work_rx) = unbounded::<DirWork>();
        let (result_tx, result_rx) = unbounded::<UnitOutcome>();

        let mut handles = Vec::with_capacity(self.config.workers);
        for id in 0..self.config.workers {
            let name = format!("walker-{}", id);
            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn({
                    let work_rx = work_rx.clone();
                    let result_tx = result_tx.clone();
                    let shutdown = Arc::clone(&self.shutdown);
                    let stats = Arc::clone(&self.stats);
                    let progress = progress.clone();
                    move || worker_loop(id, work_rx, result_tx, shutdown, stats, progress)
                })
                .map_err(|source| ScanError::WorkerSpawn { name, source })?;
            handles.push(handle);
        }
        drop(work_rx);
        // Collection below ends once every worker has dropped its sender
        drop(result_tx);

        let mut children: HashMap<String, Node> = HashMap::new();
        let mut dispatch_failed = false;

        for entry in entries {
            // Stop handing out work on interrupt; in-flight units finish naturally
            if self.shutdown.load(Ordering::Relaxed) {
                break;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(source) => {
                    self.stats.record_error();
                    progress.warn(
                        &EntryError::ReadDirFailed {
                            path: root.clone(),
                            source,
                        }
                        .to_string(),
                    );
                    continue;
                }
            };

            let entry_path = entry.path();
            let entry_meta = match probe(&entry_path) {
                Ok(meta) => meta,
                Err(err) => {
                    self.stats.record_error();
                    progress.warn(&err.to_string());
                    continue;
                }
            };

            if entry_meta.is_dir() {
                if work_tx.send(DirWork { path: entry_path }).is_err() {
                    dispatch_failed = true;
                    break;
                }
            } else {
                // Leaf at root level: dispatch overhead isn't worth it
                self.stats.record_file(entry_meta.len());
                progress.tick();
                let node = Node::file(entry_path, entry_meta.len());
                children.insert(node.name(), node);
            }
        }
        drop(work_tx);

        // Fold completed units in arrival order
        while let Ok(outcome) = result_rx.recv() {
            match outcome {
                UnitOutcome::Built(node) => {
                    children.insert(node.name(), node);
                }
                UnitOutcome::Absent => {}
                UnitOutcome::Failed { path, message } => {
                    self.stats.record_error();
                    progress.warn(&format!(
                        "Worker error while scanning under '{}': {}",
                        path.display(),
                        message
                    ));
                }
            }
        }

        for handle in handles {
            let _ = handle.join();
        }

        // No partial tree on interrupt; an interrupt outranks a closed
        // channel, since workers exiting early is a side effect of shutdown
        if self.shutdown.load(Ordering::Relaxed) {
            return Err(ScanError::Interrupted);
        }

        if dispatch_failed {
            return Err(ScanError::ChannelClosed);
        }

        self.stats.record_dir();
        Ok(Node::directory(root, children))
    }
}

/// Worker thread: pull units until the queue closes, walk each subtree
/// serially, report the outcome. Never submits work back to the pool.
fn worker_loop(
    id: usize,
    work_rx: Receiver<DirWork>,
    result_tx: Sender<UnitOutcome>,
    shutdown: Arc<AtomicBool>,
    stats: Arc<ScanStats>,
    progress: Progress,
) {
    debug!("Worker {} started", id);

    while let Ok(work) = work_rx.recv() {
        // Queued-but-unstarted work is dropped on interrupt
        if shutdown.load(Ordering::Relaxed) {
            break;
        }

        let outcome = match probe(&work.path) {
            Ok(meta) => {
                match panic::catch_unwind(AssertUnwindSafe(|| {
                    walk_single(&work.path, &meta, &stats, &progress)
                })) {
                    Ok(Some(node)) => UnitOutcome::Built(node),
                    Ok(None) => UnitOutcome::Absent,
                    Err(payload) => UnitOutcome::Failed {
                        path: work.path,
                        message: panic_message(payload),
                    },
                }
            }
            Err(err) => {
                // Raced with a delete between dispatch and start
                stats.record_error();
                progress.warn(&err.to_string());
                UnitOutcome::Absent
            }
        };

        if result_tx.send(outcome).is_err() {
            break;
        }
    }

    debug!("Worker {} finished", id);
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::SortOrder;
    use tempfile::tempdir;

    fn config(root: PathBuf, workers: usize) -> ScanConfig {
        ScanConfig {
            root,
            threshold: 0,
            order: SortOrder::Ascending,
            workers,
            show_progress: false,
        }
    }

    #[test]
    fn test_file_root_needs_no_workers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("only.bin");
        fs::write(&path, vec![0u8; 77]).unwrap();

        let scanner = Scanner::new(config(path, 4));
        let node = scanner.run(&Progress::hidden()).unwrap();

        assert!(node.is_file);
        assert_eq!(node.size, 77);
        assert_eq!(node.file_count, 1);
    }

    #[test]
    fn test_empty_directory_root() {
        let dir = tempdir().unwrap();
        let scanner = Scanner::new(config(dir.path().to_path_buf(), 2));
        let node = scanner.run(&Progress::hidden()).unwrap();

        assert!(!node.is_file);
        assert_eq!(node.size, 0);
        assert_eq!(node.file_count, 0);
        assert!(node.children.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_root_degrades_to_zero_node() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let scanner = Scanner::new(config(locked.clone(), 2));
        let node = scanner.run(&Progress::hidden()).unwrap();

        assert!(!node.is_file);
        assert_eq!(node.size, 0);
        assert_eq!(node.file_count, 0);
        assert_eq!(scanner.stats().errors, 1);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    }
}
