use collector_core::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::time::Duration;

/// CLI progress reporter using an indicatif spinner.
///
/// - Scan phase: spinner with the running book count
/// - Sync phase: spinner while the change request is delivered
pub struct CliReporter {
    bar: RefCell<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: RefCell::new(None),
        }
    }

    fn start_spinner(&self, message: String) {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(80));

        if let Some(old) = self.bar.borrow_mut().replace(pb) {
            old.finish_and_clear();
        }
    }

    fn finish_spinner(&self) {
        if let Some(pb) = self.bar.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliReporter {
    fn on_scan_start(&self, root: &str) {
        self.start_spinner(format!("Scanning {}...", root));
    }

    fn on_scan_progress(&self, books_found: usize, _current_path: &str) {
        if let Some(pb) = self.bar.borrow().as_ref() {
            pb.set_message(format!("Scanning... {} books found", books_found));
        }
    }

    fn on_scan_complete(&self, books_found: usize, collections: usize, duration_secs: f64) {
        self.finish_spinner();
        eprintln!(
            "  \x1b[32m✓\x1b[0m Scan complete: {} books in {} collections in {:.2}s",
            books_found, collections, duration_secs
        );
    }

    fn on_sync_start(&self, commands: usize, dry_run: bool) {
        if !dry_run {
            self.start_spinner(format!("Sending {} command(s)...", commands));
        }
    }

    fn on_sync_complete(&self, _success: bool) {
        self.finish_spinner();
    }
}
