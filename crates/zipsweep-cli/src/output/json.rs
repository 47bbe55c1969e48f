//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;
use zipsweep_core::ArchiveReport;
use zipsweep_core::BatchProgress;
use zipsweep_core::BatchReport;
use zipsweep_core::SettledEntry;

pub struct JsonFormatter;

#[derive(Debug, Serialize)]
struct FailureOutput {
    archive: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    entry: Option<String>,
    error: String,
}

#[derive(Debug, Serialize)]
struct UnpackOutput {
    root: String,
    archives_processed: usize,
    archives_removed: usize,
    failed_archives: usize,
    files_written: usize,
    files_skipped: usize,
    files_failed: usize,
    bytes_written: u64,
    duration_ms: u128,
    failures: Vec<FailureOutput>,
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    fn collect_failures(report: &BatchReport) -> Vec<FailureOutput> {
        let mut failures = Vec::new();
        for archive in &report.archives {
            let path = archive.path.display().to_string();
            if let Some(err) = &archive.archive_error {
                failures.push(FailureOutput {
                    archive: path.clone(),
                    entry: None,
                    error: err.to_string(),
                });
            }
            failures.extend(archive.failures.iter().map(|f| FailureOutput {
                archive: path.clone(),
                entry: Some(f.name.clone()),
                error: f.error.to_string(),
            }));
        }
        failures
    }

    fn unpack_output(root: &Path, report: &BatchReport) -> UnpackOutput {
        UnpackOutput {
            root: root.display().to_string(),
            archives_processed: report.archives_processed(),
            archives_removed: report.archives_removed(),
            failed_archives: report.failed_archives(),
            files_written: report.files_written(),
            files_skipped: report.files_skipped(),
            files_failed: report.files_failed(),
            bytes_written: report.bytes_written(),
            duration_ms: report.duration.as_millis(),
            failures: Self::collect_failures(report),
        }
    }
}

// The JSON document is emitted once, at the end of the run
impl BatchProgress for JsonFormatter {
    fn on_archive_start(&mut self, _archive: &Path) {}

    fn on_entry_settled(&mut self, _archive: &Path, _entry: &SettledEntry) {}

    fn on_archive_complete(&mut self, _report: &ArchiveReport) {}
}

impl OutputFormatter for JsonFormatter {
    fn format_batch_result(&self, root: &Path, report: &BatchReport) -> Result<()> {
        let data = Self::unpack_output(root, report);
        if report.has_failures() {
            let message = format!("{} archive(s) had errors", report.failed_archives());
            Self::output(&JsonOutput::partial("unpack", data, message))
        } else {
            Self::output(&JsonOutput::success("unpack", data))
        }
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error("unpack", format!("{error:?}"));
        let _ = Self::output(&output);
    }
}
