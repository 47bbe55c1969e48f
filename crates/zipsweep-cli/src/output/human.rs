//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use crate::error::hint_for;
use anyhow::Result;
use console::Term;
use console::style;
use std::path::Path;
use zipsweep_core::ArchiveReport;
use zipsweep_core::BatchProgress;
use zipsweep_core::BatchReport;
use zipsweep_core::EntryOutcome;
use zipsweep_core::SettledEntry;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn entry_line(entry: &SettledEntry) -> String {
        match &entry.outcome {
            EntryOutcome::Written { bytes } => {
                format!("  Wrote {} ({})", entry.name, Self::format_size(*bytes))
            }
            EntryOutcome::Skipped => format!("  Skipping {}", entry.name),
            EntryOutcome::Failed(err) => format!("  Failed {}: {err}", entry.name),
        }
    }

    fn write_warning_header(&self, text: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {text}", style("WARNING!").yellow().bold()));
        } else {
            let _ = self.term.write_line(&format!("WARNING! {text}"));
        }
    }
}

impl BatchProgress for HumanFormatter {
    fn on_archive_start(&mut self, archive: &Path) {
        if self.quiet {
            return;
        }
        let _ = self
            .term
            .write_line(&format!("Processing: {}", archive.display()));
    }

    fn on_entry_settled(&mut self, _archive: &Path, entry: &SettledEntry) {
        if self.quiet || !self.verbose {
            return;
        }
        let _ = self.term.write_line(&Self::entry_line(entry));
    }

    fn on_archive_complete(&mut self, report: &ArchiveReport) {
        // Failures are shown even in quiet mode
        if let Some(err) = &report.archive_error {
            self.write_warning_header(&format!("Could not process {}: {err}", report.path.display()));
            if let Some(hint) = hint_for(err) {
                let _ = self.term.write_line(&format!("  HINT: {hint}"));
            }
        }

        if !report.failures.is_empty() {
            self.write_warning_header("The following files had errors:");
            for failure in &report.failures {
                let _ = self
                    .term
                    .write_line(&format!("{}: {}", failure.name, failure.error));
            }
            if let Some(hint) = report.failures.first().and_then(|f| hint_for(&f.error)) {
                let _ = self.term.write_line(&format!("  HINT: {hint}"));
            }
        }

        if report.removed && self.verbose && !self.quiet {
            let _ = self
                .term
                .write_line(&format!("Removed {}", report.path.display()));
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_batch_result(&self, root: &Path, report: &BatchReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let headline = format!(
            "Unpacked {} archive(s) under {}",
            report.archives_processed(),
            root.display()
        );
        if self.use_colors && !report.has_failures() {
            let _ = self
                .term
                .write_line(&format!("{} {headline}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(&headline);
        }

        let _ = self
            .term
            .write_line(&format!("  Files written: {}", report.files_written()));
        let _ = self
            .term
            .write_line(&format!("  Files skipped: {}", report.files_skipped()));
        let _ = self.term.write_line(&format!(
            "  Total size: {}",
            Self::format_size(report.bytes_written())
        ));

        if report.archives_removed() > 0 {
            let _ = self
                .term
                .write_line(&format!("  Archives removed: {}", report.archives_removed()));
        }

        if report.has_failures() {
            let _ = self.term.write_line(&format!(
                "  Archives with errors: {} ({} file(s) failed)",
                report.failed_archives(),
                report.files_failed()
            ));
        }

        let _ = self.term.write_line(&format!(
            "Done in {:.3} seconds",
            report.duration.as_secs_f64()
        ));

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = term.write_line(&format!("ERROR: {error:?}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zipsweep_core::ExtractionError;

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(HumanFormatter::format_size(0), "0 B");
        assert_eq!(HumanFormatter::format_size(1023), "1023 B");
    }

    #[test]
    fn test_format_size_units() {
        assert_eq!(HumanFormatter::format_size(1024), "1.0 KB");
        assert_eq!(HumanFormatter::format_size(1536), "1.5 KB");
        assert_eq!(HumanFormatter::format_size(1024 * 1024), "1.0 MB");
        assert_eq!(HumanFormatter::format_size(1024 * 1024 * 1024), "1.0 GB");
    }

    #[test]
    fn test_entry_lines() {
        let written = SettledEntry {
            name: "1.flac".to_string(),
            outcome: EntryOutcome::Written { bytes: 2048 },
        };
        assert_eq!(HumanFormatter::entry_line(&written), "  Wrote 1.flac (2.0 KB)");

        let skipped = SettledEntry {
            name: "2.flac".to_string(),
            outcome: EntryOutcome::Skipped,
        };
        assert_eq!(HumanFormatter::entry_line(&skipped), "  Skipping 2.flac");

        let failed = SettledEntry {
            name: "3.flac".to_string(),
            outcome: EntryOutcome::Failed(ExtractionError::InvalidArchive("crc".to_string())),
        };
        assert!(HumanFormatter::entry_line(&failed).starts_with("  Failed 3.flac"));
    }
}
