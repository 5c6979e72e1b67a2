//! Configuration types for sizetree
//!
//! This module defines:
//! - CLI argument parsing using clap derive macros
//! - Runtime configuration with validation
//! - Human-form size parsing (`10M`, `500K`, ...)

use crate::error::ConfigError;
use crate::render::SortOrder;
use clap::Parser;
use std::path::PathBuf;

/// Maximum reasonable worker count
const MAX_WORKERS: usize = 512;

/// Fast tree-size viewer
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sizetree",
    version,
    about = "Fast tree-size viewer (cross-platform)",
    long_about = "Computes the recursive size and file count of every file and directory\n\
                  under a root and prints the results as a sorted tree.\n\n\
                  Immediate subdirectories of the root are walked in parallel; symlinks\n\
                  are never followed.",
    after_help = "EXAMPLES:\n    \
        sizetree /var/log -t 10M -d\n    \
        sizetree ~/src -w 8 -q\n    \
        sizetree . -t 500K"
)]
pub struct CliArgs {
    /// Path to scan
    #[arg(value_name = "ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Minimum size to display (e.g. 10M, 500K)
    #[arg(short = 't', long, default_value = "0", value_name = "SIZE")]
    pub threshold: String,

    /// Ascending order (default)
    #[arg(short = 'a', long, conflicts_with = "desc")]
    pub asc: bool,

    /// Descending order
    #[arg(short = 'd', long)]
    pub desc: bool,

    /// Number of worker threads for top-level subdirectories
    #[arg(
        short = 'w',
        long,
        default_value_t = default_workers(),
        value_name = "NUM"
    )]
    pub workers: usize,

    /// Quiet mode - suppress the progress spinner
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Validated runtime configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Root path to scan
    pub root: PathBuf,

    /// Minimum byte size for a node to appear in output
    pub threshold: u64,

    /// Sibling sort direction
    pub order: SortOrder,

    /// Worker threads for top-level subdirectories
    pub workers: usize,

    /// Whether to show the progress spinner
    pub show_progress: bool,
}

impl ScanConfig {
    /// Validate CLI arguments and build the runtime configuration
    pub fn from_args(args: CliArgs) -> Result<Self, ConfigError> {
        // Nonexistent root is a usage error, reported before any scanning
        if !args.root.exists() {
            return Err(ConfigError::RootNotFound {
                path: std::path::absolute(&args.root).unwrap_or(args.root),
            });
        }

        if args.workers == 0 || args.workers > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: args.workers,
                max: MAX_WORKERS,
            });
        }

        let threshold = parse_size(&args.threshold)?;

        let order = if args.desc {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        };

        Ok(Self {
            root: args.root,
            threshold,
            order,
            workers: args.workers,
            show_progress: !args.quiet,
        })
    }
}

/// Default to 2x CPU cores (walking is I/O bound), capped at 32
fn default_workers() -> usize {
    (num_cpus::get() * 2).min(32)
}

/// Parse a size like `123`, `10K`, `20M`, `3G` (case-insensitive, powers of
/// 1024) into bytes. Fractional prefixes (`1.5G`) truncate to whole bytes.
pub fn parse_size(text: &str) -> Result<u64, ConfigError> {
    let trimmed = text.trim().to_uppercase();
    if trimmed.is_empty() {
        return Ok(0);
    }

    let multiplier: Option<u64> = match trimmed.chars().last() {
        Some('K') => Some(1024),
        Some('M') => Some(1024u64.pow(2)),
        Some('G') => Some(1024u64.pow(3)),
        Some('T') => Some(1024u64.pow(4)),
        _ => None,
    };

    match multiplier {
        Some(mult) => {
            // Suffix is a single ASCII letter, so the byte slice is safe
            let prefix = trimmed[..trimmed.len() - 1].trim();
            let num: f64 = prefix.parse().map_err(|_| ConfigError::InvalidThreshold {
                text: text.to_string(),
                reason: format!("'{}' is not a number", prefix),
            })?;
            if num < 0.0 || !num.is_finite() {
                return Err(ConfigError::InvalidThreshold {
                    text: text.to_string(),
                    reason: "size must be a non-negative finite number".to_string(),
                });
            }
            Ok((num * mult as f64) as u64)
        }
        None => trimmed
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidThreshold {
                text: text.to_string(),
                reason: "expected an integer with optional K/M/G/T suffix".to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(root: &str, workers: usize) -> CliArgs {
        CliArgs {
            root: PathBuf::from(root),
            threshold: "0".to_string(),
            asc: false,
            desc: false,
            workers,
            quiet: true,
            verbose: false,
        }
    }

    #[test]
    fn test_parse_size_plain_bytes() {
        assert_eq!(parse_size("0").unwrap(), 0);
        assert_eq!(parse_size("123").unwrap(), 123);
        assert_eq!(parse_size("  42  ").unwrap(), 42);
        assert_eq!(parse_size("").unwrap(), 0);
    }

    #[test]
    fn test_parse_size_suffixes() {
        assert_eq!(parse_size("10M").unwrap(), 10 * 1024 * 1024);
        assert_eq!(parse_size("3G").unwrap(), 3 * 1024u64.pow(3));
        assert_eq!(parse_size("2T").unwrap(), 2 * 1024u64.pow(4));
        assert_eq!(parse_size("500K").unwrap(), 500 * 1024);
    }

    #[test]
    fn test_parse_size_case_insensitive() {
        assert_eq!(parse_size("5k").unwrap(), parse_size("5K").unwrap());
        assert_eq!(parse_size("1g").unwrap(), parse_size("1G").unwrap());
    }

    #[test]
    fn test_parse_size_fractional_truncates() {
        assert_eq!(parse_size("1.5K").unwrap(), 1536);
        assert_eq!(parse_size("0.5M").unwrap(), 512 * 1024);
    }

    #[test]
    fn test_parse_size_rejects_garbage() {
        assert!(parse_size("abc").is_err());
        assert!(parse_size("12Q").is_err());
        assert!(parse_size("-5").is_err());
        assert!(parse_size("-5K").is_err());
        assert!(parse_size("K").is_err());
    }

    #[test]
    fn test_default_workers_bounds() {
        let workers = default_workers();
        assert!(workers >= 1);
        assert!(workers <= 32);
    }

    #[test]
    fn test_from_args_missing_root() {
        let result = ScanConfig::from_args(args("/definitely/not/a/real/path", 4));
        assert!(matches!(
            result,
            Err(ConfigError::RootNotFound { .. })
        ));
    }

    #[test]
    fn test_from_args_worker_bounds() {
        assert!(matches!(
            ScanConfig::from_args(args(".", 0)),
            Err(ConfigError::InvalidWorkerCount { .. })
        ));
        assert!(matches!(
            ScanConfig::from_args(args(".", MAX_WORKERS + 1)),
            Err(ConfigError::InvalidWorkerCount { .. })
        ));
        assert!(ScanConfig::from_args(args(".", MAX_WORKERS)).is_ok());
    }

    #[test]
    fn test_from_args_order_and_threshold() {
        let mut a = args(".", 4);
        a.threshold = "10M".to_string();
        a.desc = true;
        let config = ScanConfig::from_args(a).unwrap();
        assert_eq!(config.threshold, 10 * 1024 * 1024);
        assert_eq!(config.order, SortOrder::Descending);
        assert!(!config.show_progress);

        let config = ScanConfig::from_args(args(".", 4)).unwrap();
        assert_eq!(config.order, SortOrder::Ascending);
    }
}
