//! sizetree - Fast tree-size viewer
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use clap::Parser;
use sizetree::config::{CliArgs, ScanConfig};
use sizetree::error::ScanError;
use sizetree::progress::Progress;
use sizetree::render::print_tree;
use sizetree::walker::Scanner;
use std::process::ExitCode;
use std::sync::atomic::Ordering;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse();

    // Setup logging
    setup_logging(args.verbose)?;

    // Validate and create config
    let config = ScanConfig::from_args(args).context("Invalid configuration")?;

    let scanner = Scanner::new(config.clone());

    // Setup signal handler for graceful shutdown
    let shutdown_flag = scanner.shutdown_flag();
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, shutting down...");
        shutdown_flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to set signal handler")?;

    let progress = if config.show_progress {
        Progress::new()
    } else {
        Progress::hidden()
    };

    let resolved = config
        .root
        .canonicalize()
        .unwrap_or_else(|_| config.root.clone());
    println!("Building tree for {}...", resolved.display());

    // Run the scan
    let root = match scanner.run(&progress) {
        Ok(root) => root,
        Err(ScanError::Interrupted) => {
            // Graceful return, no partial tree, neutral exit status
            progress.finish_and_clear();
            progress.warn("Keyboard interrupt, aborting.");
            return Ok(());
        }
        Err(e) => return Err(e).context("Scan failed"),
    };
    progress.finish_and_clear();

    let stats = scanner.stats();
    info!(
        dirs = stats.dirs,
        files = stats.files,
        bytes = stats.bytes,
        "Scan complete"
    );
    if stats.errors > 0 {
        info!(errors = stats.errors, "Scan completed with errors");
    }

    println!("Printing tree in {} order...", config.order.label());
    print_tree(&root, config.threshold, config.order);

    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("sizetree=debug,warn")
    } else {
        EnvFilter::new("sizetree=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    Ok(())
}
