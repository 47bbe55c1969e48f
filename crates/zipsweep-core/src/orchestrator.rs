//! Sequential driver of the archive pipeline.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::ArchivePipeline;
use crate::UnpackConfig;
use crate::pipeline::OpenedArchive;
use crate::report::ArchiveReport;
use crate::report::BatchProgress;
use crate::report::BatchReport;

/// Processes every archive under a root, strictly one after another.
///
/// For each archive the orchestrator announces it, waits for all of its
/// entries to settle, closes the handle, and deletes the source archive
/// only when cleanup is enabled and no entry failed.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    config: Arc<UnpackConfig>,
}

impl Orchestrator {
    /// Creates an orchestrator for `config`.
    #[must_use]
    pub fn new(config: UnpackConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns the run configuration.
    #[must_use]
    pub fn config(&self) -> &UnpackConfig {
        &self.config
    }

    /// Runs over `root` and returns the batch report.
    ///
    /// Failures are recorded per archive; the run itself never aborts.
    pub async fn run(&self, root: &Path, progress: &mut dyn BatchProgress) -> BatchReport {
        let start = Instant::now();
        let mut batch = BatchReport::new();
        let mut pipeline = ArchivePipeline::new(root, Arc::clone(&self.config));

        while let Some(next) = pipeline.next_archive().await {
            let report = match next {
                Ok(opened) => self.process(opened, progress).await,
                Err(failure) => {
                    progress.on_archive_start(&failure.path);
                    ArchiveReport::unreadable(failure.path, failure.error)
                }
            };
            progress.on_archive_complete(&report);
            batch.archives.push(report);
        }

        batch.duration = start.elapsed();
        tracing::debug!(
            archives = batch.archives_processed(),
            elapsed = ?batch.duration,
            "run finished"
        );
        batch
    }

    async fn process(&self, opened: OpenedArchive, progress: &mut dyn BatchProgress) -> ArchiveReport {
        let OpenedArchive {
            path,
            handle,
            mut pending,
            ..
        } = opened;

        progress.on_archive_start(&path);
        tracing::debug!(archive = %path.display(), entries = pending.len(), "awaiting entries");

        let mut report = ArchiveReport::new(path);
        while let Some(settled) = pending.next_settled().await {
            if self.config.verbose {
                progress.on_entry_settled(&report.path, &settled);
            }
            report.record(settled);
        }

        // every entry task has been joined, so no reader outlives this point
        handle.close();

        if report.has_failures() {
            for failure in &report.failures {
                tracing::debug!(
                    archive = %report.path.display(),
                    entry = %failure.name,
                    error = %failure.error,
                    "entry failed"
                );
            }
            return report;
        }

        if self.config.cleanup {
            match tokio::fs::remove_file(&report.path).await {
                Ok(()) => {
                    tracing::info!(archive = %report.path.display(), "archive removed");
                    report.removed = true;
                }
                Err(err) => {
                    tracing::warn!(archive = %report.path.display(), error = %err, "could not remove archive");
                }
            }
        }

        report
    }
}
