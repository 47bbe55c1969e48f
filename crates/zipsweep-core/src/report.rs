//! Per-entry outcomes, per-archive and per-run reports, and the progress
//! observer used to surface them while a run is in flight.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use crate::ExtractionError;

/// Result of processing one archive entry.
#[derive(Debug)]
pub enum EntryOutcome {
    /// The entry was written to disk (directories count with zero bytes).
    Written {
        /// Bytes written to the destination file.
        bytes: u64,
    },

    /// The destination already existed and `force` was off.
    Skipped,

    /// The entry could not be extracted.
    Failed(ExtractionError),
}

impl EntryOutcome {
    /// Returns `true` unless the outcome is `Failed`.
    #[must_use]
    pub const fn is_fulfilled(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// An entry outcome paired with the entry name it belongs to.
#[derive(Debug)]
pub struct SettledEntry {
    /// Entry name inside the archive.
    pub name: String,

    /// How the entry ended.
    pub outcome: EntryOutcome,
}

/// An entry that failed, as reported in the per-archive failure block.
#[derive(Debug)]
pub struct EntryFailure {
    /// Entry name inside the archive.
    pub name: String,

    /// Why it failed.
    pub error: ExtractionError,
}

/// Summary of one processed archive.
#[derive(Debug)]
pub struct ArchiveReport {
    /// Path of the source archive.
    pub path: PathBuf,

    /// Number of entries written.
    pub entries_written: usize,

    /// Number of entries skipped because their destination existed.
    pub entries_skipped: usize,

    /// Total bytes written for this archive.
    pub bytes_written: u64,

    /// Entries that failed, in completion order.
    pub failures: Vec<EntryFailure>,

    /// Archive-level failure (unreadable archive or destination).
    pub archive_error: Option<ExtractionError>,

    /// Whether the source archive was deleted.
    pub removed: bool,
}

impl ArchiveReport {
    /// Creates an empty report for `path`.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            entries_written: 0,
            entries_skipped: 0,
            bytes_written: 0,
            failures: Vec::new(),
            archive_error: None,
            removed: false,
        }
    }

    /// Creates a report for an archive that could not be processed at all.
    #[must_use]
    pub fn unreadable(path: PathBuf, error: ExtractionError) -> Self {
        Self {
            archive_error: Some(error),
            ..Self::new(path)
        }
    }

    /// Folds one settled entry into the report.
    pub fn record(&mut self, entry: SettledEntry) {
        match entry.outcome {
            EntryOutcome::Written { bytes } => {
                self.entries_written += 1;
                self.bytes_written = self.bytes_written.saturating_add(bytes);
            }
            EntryOutcome::Skipped => self.entries_skipped += 1,
            EntryOutcome::Failed(error) => self.failures.push(EntryFailure {
                name: entry.name,
                error,
            }),
        }
    }

    /// Returns `true` if any entry failed or the archive could not be read.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.archive_error.is_some() || !self.failures.is_empty()
    }
}

/// Report of a whole run over one root directory.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One report per archive, in processing order.
    pub archives: Vec<ArchiveReport>,

    /// Wall-clock time of the run.
    pub duration: Duration,
}

impl BatchReport {
    /// Creates an empty batch report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of archives visited.
    #[must_use]
    pub fn archives_processed(&self) -> usize {
        self.archives.len()
    }

    /// Number of archives with at least one failure.
    #[must_use]
    pub fn failed_archives(&self) -> usize {
        self.archives.iter().filter(|a| a.has_failures()).count()
    }

    /// Number of source archives deleted.
    #[must_use]
    pub fn archives_removed(&self) -> usize {
        self.archives.iter().filter(|a| a.removed).count()
    }

    /// Total entries written across archives.
    #[must_use]
    pub fn files_written(&self) -> usize {
        self.archives.iter().map(|a| a.entries_written).sum()
    }

    /// Total entries skipped across archives.
    #[must_use]
    pub fn files_skipped(&self) -> usize {
        self.archives.iter().map(|a| a.entries_skipped).sum()
    }

    /// Total entries failed across archives.
    #[must_use]
    pub fn files_failed(&self) -> usize {
        self.archives.iter().map(|a| a.failures.len()).sum()
    }

    /// Total bytes written across archives.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.archives.iter().map(|a| a.bytes_written).sum()
    }

    /// Returns whether any archive had failures.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.archives.iter().any(ArchiveReport::has_failures)
    }
}

/// Observer for run progress.
///
/// Callbacks are invoked from the orchestrating task, in order, one archive
/// at a time.
///
/// # Examples
///
/// ```
/// use zipsweep_core::BatchProgress;
/// use zipsweep_core::ArchiveReport;
/// use zipsweep_core::SettledEntry;
/// use std::path::Path;
///
/// struct Printer;
///
/// impl BatchProgress for Printer {
///     fn on_archive_start(&mut self, archive: &Path) {
///         println!("Processing: {}", archive.display());
///     }
///
///     fn on_entry_settled(&mut self, _archive: &Path, entry: &SettledEntry) {
///         println!("  {}", entry.name);
///     }
///
///     fn on_archive_complete(&mut self, report: &ArchiveReport) {
///         if report.has_failures() {
///             println!("WARNING! {} had errors", report.path.display());
///         }
///     }
/// }
/// ```
pub trait BatchProgress {
    /// Called before an archive's entries are awaited.
    fn on_archive_start(&mut self, archive: &Path);

    /// Called for every entry once it has settled.
    fn on_entry_settled(&mut self, archive: &Path, entry: &SettledEntry);

    /// Called once the archive has been closed (and possibly removed).
    fn on_archive_complete(&mut self, report: &ArchiveReport);
}

/// No-op implementation of `BatchProgress`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl BatchProgress for NoopProgress {
    fn on_archive_start(&mut self, _archive: &Path) {}

    fn on_entry_settled(&mut self, _archive: &Path, _entry: &SettledEntry) {}

    fn on_archive_complete(&mut self, _report: &ArchiveReport) {}
}
