/// Trait for reporting collector progress.
///
/// The CLI implements it with indicatif; all methods default to no-ops.
pub trait ProgressReporter {
    fn on_scan_start(&self, _root: &str) {}
    fn on_scan_progress(&self, _books_found: usize, _current_path: &str) {}
    fn on_scan_complete(&self, _books_found: usize, _collections: usize, _duration_secs: f64) {}
    fn on_sync_start(&self, _commands: usize, _dry_run: bool) {}
    fn on_sync_complete(&self, _success: bool) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
