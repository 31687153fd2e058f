use crate::aggregate::{self, CollectionAggregator};
use crate::batch::{self, BatchBuilder, ChangeRequest};
use crate::catalog::Catalog;
use crate::collection::CollectionMap;
use crate::config::AppConfig;
use crate::error::Error;
use crate::progress::ProgressReporter;
use crate::scanner;
use crate::sync::{SyncExecutor, SyncOutcome};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

pub struct CollectorEngine {
    config: AppConfig,
}

#[derive(Debug, Clone)]
pub struct ScanStats {
    /// Files added to a collection.
    pub books_found: usize,
    /// Collections created before pruning.
    pub collections_found: usize,
    pub collections_dropped: usize,
    pub duration: Duration,
}

#[derive(Debug)]
pub struct RunResult {
    /// Absent when the run only removed collections.
    pub scan: Option<ScanStats>,
    pub commands: usize,
    pub sync: SyncOutcome,
}

impl CollectorEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn open_catalog(&self) -> Result<Catalog, Error> {
        Ok(Catalog::open(&self.config.catalog_path)?)
    }

    /// Walk the documents root and collect catalog-known books per
    /// directory. Empty collections are dropped before returning.
    pub fn scan(
        &self,
        catalog: &Catalog,
        reporter: &dyn ProgressReporter,
    ) -> Result<(CollectionMap, ScanStats), Error> {
        let root = Path::new(&self.config.documents_root);
        info!("Scanning {}", root.display());
        reporter.on_scan_start(&self.config.documents_root);

        let start = Instant::now();
        let mut collections = CollectionMap::new();
        let books_found = {
            let mut aggregator = CollectionAggregator::new(catalog, &mut collections)
                .with_progress(|found, path| {
                    reporter.on_scan_progress(found, &path.to_string_lossy())
                });
            scanner::walk(root, &mut aggregator)?
        };
        info!("Found {} book(s) associated with collections", books_found);

        let collections_found = collections.len();
        let collections_dropped = aggregate::drop_empty_collections(&mut collections);
        let duration = start.elapsed();
        reporter.on_scan_complete(books_found, collections.len(), duration.as_secs_f64());

        Ok((
            collections,
            ScanStats {
                books_found,
                collections_found,
                collections_dropped,
                duration,
            },
        ))
    }

    /// Build the change request for this run: either the delete-all batch
    /// or the update batch for a fresh scan.
    pub fn build_request(
        &self,
        catalog: &Catalog,
        reporter: &dyn ProgressReporter,
    ) -> Result<(ChangeRequest, Option<ScanStats>), Error> {
        if self.config.remove_all {
            info!("Removing all collections");
            let commands = batch::build_delete_all_batch(catalog)?;
            return Ok((ChangeRequest::new(self.config.request_id, commands), None));
        }

        let (collections, stats) = self.scan(catalog, reporter)?;
        let commands = BatchBuilder::new(self.config.force_visible)
            .build_update_batch(catalog, &collections)?;
        debug!(
            "Built {} command(s) for {} collection(s)",
            commands.len(),
            collections.len()
        );
        Ok((ChangeRequest::new(self.config.request_id, commands), Some(stats)))
    }

    /// Full pipeline. Fatal errors (catalog, HTTP client, unreadable root)
    /// are returned; delivery failures are reported in `RunResult::sync`.
    pub fn run(&self, reporter: &dyn ProgressReporter) -> Result<RunResult, Error> {
        self.run_with_sink(reporter, &mut std::io::stdout())
    }

    pub fn run_with_sink<W: Write>(
        &self,
        reporter: &dyn ProgressReporter,
        sink: &mut W,
    ) -> Result<RunResult, Error> {
        let catalog = self.open_catalog()?;
        let executor = if self.config.dry_run {
            SyncExecutor::print_only()
        } else {
            SyncExecutor::commit(&self.config.manager_url)?
        };

        let (request, scan) = self.build_request(&catalog, reporter)?;
        let commands = request.commands.len();

        reporter.on_sync_start(commands, executor.is_dry_run());
        let sync = match executor.execute_with_sink(&request, sink) {
            Ok(outcome) => outcome,
            Err(err) => {
                error!("Unable to deliver change request: {}", err);
                SyncOutcome::Failed(err.to_string())
            }
        };
        reporter.on_sync_complete(!matches!(sync, SyncOutcome::Failed(_)));

        Ok(RunResult {
            scan,
            commands,
            sync,
        })
    }
}
