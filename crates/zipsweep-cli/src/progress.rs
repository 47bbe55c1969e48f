//! Spinner shown while a run is in progress.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use std::path::Path;
use std::time::Duration;
use zipsweep_core::ArchiveReport;
use zipsweep_core::BatchProgress;
use zipsweep_core::SettledEntry;

use crate::output::OutputFormatter;

/// Wraps an output formatter with a TTY spinner.
///
/// Every callback is forwarded to the inner formatter with the spinner
/// suspended, so printed lines never interleave with the spinner. The
/// spinner is cleared on drop.
pub struct CliProgress<'a> {
    bar: ProgressBar,
    inner: &'a mut dyn OutputFormatter,
    archives: u64,
    bytes_written: u64,
}

impl<'a> CliProgress<'a> {
    #[must_use]
    pub fn new(inner: &'a mut dyn OutputFormatter) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.enable_steady_tick(Duration::from_millis(100));

        Self {
            bar,
            inner,
            archives: 0,
            bytes_written: 0,
        }
    }

    /// Checks if we should show progress (TTY detection).
    #[must_use]
    pub fn should_show(json: bool, quiet: bool) -> bool {
        !json && !quiet && Term::stdout().is_term()
    }

    fn status(&self, current: &str) -> String {
        format!(
            "{current} ({} archive(s), {})",
            self.archives,
            humanize_bytes(self.bytes_written)
        )
    }
}

impl Drop for CliProgress<'_> {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

impl BatchProgress for CliProgress<'_> {
    fn on_archive_start(&mut self, archive: &Path) {
        self.archives += 1;
        let name = archive
            .file_name()
            .map_or_else(|| archive.display().to_string(), |n| n.to_string_lossy().into_owned());
        self.bar.set_message(self.status(&name));

        let inner = &mut *self.inner;
        self.bar.suspend(|| inner.on_archive_start(archive));
    }

    fn on_entry_settled(&mut self, archive: &Path, entry: &SettledEntry) {
        self.bar.set_message(self.status(&entry.name));

        let inner = &mut *self.inner;
        self.bar.suspend(|| inner.on_entry_settled(archive, entry));
    }

    fn on_archive_complete(&mut self, report: &ArchiveReport) {
        // entries only reach the observer in verbose mode
        self.bytes_written = self.bytes_written.saturating_add(report.bytes_written);
        let inner = &mut *self.inner;
        self.bar.suspend(|| inner.on_archive_complete(report));
    }
}

/// Converts bytes to human-readable format (KB, MB, GB, TB).
fn humanize_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.1} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
