//! Progress reporting for the scanner
//!
//! A single process-wide spinner on stdout, shared by the main thread and
//! every worker. The bar's internal lock serializes all access, and a
//! hidden bar is a drop-in no-op for quiet mode and tests. The spinner is
//! interactive feedback only; scan results never depend on it.

use crate::render::format_number;
use crate::walker::StatsSnapshot;
use console::style;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

/// Handle on the shared spinner. Clones all point at the same bar.
#[derive(Clone)]
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    /// Create a visible spinner drawing to stdout
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stdout());

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .expect("Invalid progress template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// No-op substitute used in quiet mode and by every test
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Advance the spinner animation (called from worker threads)
    pub fn tick(&self) {
        self.bar.tick();
    }

    /// Refresh the live counters shown next to the spinner
    pub fn update(&self, snapshot: &StatsSnapshot) {
        let msg = format!(
            "Dirs: {} | Files: {} | Size: {}",
            format_number(snapshot.dirs),
            format_number(snapshot.files),
            format_size(snapshot.bytes, BINARY),
        );
        self.bar.set_message(msg);
    }

    /// Print a single-line warning without tearing the spinner redraw.
    /// Warnings are never fatal and never go through the log filter.
    pub fn warn(&self, message: &str) {
        self.bar
            .suspend(|| eprintln!("{}", style(message).yellow()));
    }

    /// Stop the spinner and erase its line
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_progress_is_inert() {
        let progress = Progress::hidden();
        progress.tick();
        progress.update(&StatsSnapshot {
            dirs: 3,
            files: 12,
            bytes: 4096,
            errors: 0,
        });
        progress.warn("nothing to see");
        progress.finish_and_clear();
    }
}
