//! Error types for sizetree
//!
//! Design philosophy:
//! - Use thiserror for structured error types in library code
//! - Per-entry filesystem failures are warnings, not errors: they are
//!   carried as `EntryError` payloads for the warning text and never
//!   propagated up the call stack
//! - Only usage errors and a user interrupt abort a scan

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the sizetree application
#[derive(Error, Debug)]
pub enum ScanError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Interrupted by signal
    #[error("Scan interrupted by signal")]
    Interrupted,

    /// Channel closed unexpectedly
    #[error("Worker channel closed unexpectedly")]
    ChannelClosed,

    /// Worker thread could not be spawned
    #[error("Failed to spawn worker thread '{name}': {source}")]
    WorkerSpawn {
        name: String,
        source: std::io::Error,
    },
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Root path does not exist
    #[error("Cannot find path '{}' because it does not exist", .path.display())]
    RootNotFound { path: PathBuf },

    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Unparseable size threshold
    #[error("Invalid size '{text}': {reason}")]
    InvalidThreshold { text: String, reason: String },
}

/// Soft per-entry failures. These are warning payloads: the failing entry
/// is omitted from its parent's aggregate and the scan continues.
#[derive(Error, Debug)]
pub enum EntryError {
    /// Stat operation failed (permission, vanished entry, transient I/O)
    #[error("Can't stat this entry '{}': {}", .path.display(), .source)]
    StatFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Directory could not be enumerated
    #[error("Cannot access directory '{}': {}", .path.display(), .source)]
    ReadDirFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for ScanError
pub type Result<T> = std::result::Result<T, ScanError>;
