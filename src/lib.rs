//! sizetree - Fast tree-size viewer
//!
//! Computes the recursive size and file count of every file and directory
//! under a filesystem root and prints the results as a sorted,
//! threshold-filtered tree.
//!
//! # Features
//!
//! - **Bounded fan-out**: immediate subdirectories of the scan root are
//!   walked in parallel by a bounded worker pool; everything below the
//!   first level is plain synchronous recursion, so a worker can never
//!   block waiting on the pool that runs it.
//!
//! - **Lossy degradation**: a path that cannot be stat'ed or a directory
//!   that cannot be read costs one warning and contributes nothing; a
//!   single bad subtree never aborts the scan.
//!
//! - **Symlinks are leaves**: entries are classified from their own lstat
//!   data and never followed, so symlink loops cannot occur.
//!
//! # Architecture
//!
//! ```text
//! CLI ──▶ Scanner (root readdir)
//!           │
//!           ├── immediate file ──▶ leaf Node (inline)
//!           ├── subdir A ──▶ worker: walk_single(A) ─┐  serial recursion
//!           ├── subdir B ──▶ worker: walk_single(B) ─┤
//!           └── subdir C ──▶ worker: walk_single(C) ─┘
//!           │
//!           └──▶ fold (completion order) ──▶ root Node ──▶ render
//! ```
//!
//! # Example
//!
//! ```bash
//! # Largest first, hide anything under 10 MiB
//! sizetree /var/log -t 10M -d
//! ```

pub mod config;
pub mod error;
pub mod progress;
pub mod render;
pub mod tree;
pub mod walker;

pub use config::{parse_size, CliArgs, ScanConfig};
pub use error::{ConfigError, EntryError, Result, ScanError};
pub use progress::Progress;
pub use render::{flatten, print_tree, SortOrder};
pub use tree::{aggregate, Node};
pub use walker::{probe, walk_single, ScanStats, Scanner, StatsSnapshot};
