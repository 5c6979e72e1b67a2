//! Single-threaded subtree walker
//!
//! [`walk_single`] is the serial half of the two-tier model: it recurses
//! through one subtree entirely on the calling thread and never touches the
//! worker pool, directly or transitively. That boundary is the
//! deadlock-avoidance invariant of the whole design.

use crate::error::EntryError;
use crate::progress::Progress;
use crate::tree::Node;
use crate::walker::ScanStats;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Stat a single path without following symlinks.
///
/// A symlink is classified from its own lstat data, so a symlinked
/// directory is treated as a leaf and never traversed; symlink loops
/// cannot occur.
pub fn probe(path: &Path) -> Result<fs::Metadata, EntryError> {
    fs::symlink_metadata(path).map_err(|source| EntryError::StatFailed {
        path: path.to_path_buf(),
        source,
    })
}

/// Recursively build the [`Node`] for one subtree on the calling thread.
///
/// `meta` is the path's own stat, already obtained by the caller (every
/// caller has just probed the path, so re-statting here would be wasted
/// work). Returns `None` when the directory itself cannot be enumerated;
/// the warning is emitted at the failure site and the caller folds `None`
/// silently, so nothing is warned twice.
pub fn walk_single(
    path: &Path,
    meta: &fs::Metadata,
    stats: &ScanStats,
    progress: &Progress,
) -> Option<Node> {
    progress.tick();

    if !meta.is_dir() {
        stats.record_file(meta.len());
        return Some(Node::file(path.to_path_buf(), meta.len()));
    }

    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(source) => {
            stats.record_error();
            progress.warn(
                &EntryError::ReadDirFailed {
                    path: path.to_path_buf(),
                    source,
                }
                .to_string(),
            );
            return None;
        }
    };

    let mut children: HashMap<String, Node> = HashMap::new();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                stats.record_error();
                progress.warn(
                    &EntryError::ReadDirFailed {
                        path: path.to_path_buf(),
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
                // Warn, skip, keep walking: one bad entry never costs the subtree
                stats.record_error();
                progress.warn(&err.to_string());
                continue;
            }
        };

        if let Some(child) = walk_single(&entry_path, &entry_meta, stats, progress) {
            children.insert(child.name(), child);
        }
    }

    stats.record_dir();
    debug!("Walked {}", path.display());
    Some(Node::directory(path.to_path_buf(), children))
}
