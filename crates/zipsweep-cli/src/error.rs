//! Error conversion utilities for CLI.
//!
//! Converts zipsweep-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::path::Path;
use zipsweep_core::ExtractionError;

/// Returns an actionable hint for an error, if there is one.
pub fn hint_for(err: &ExtractionError) -> Option<&'static str> {
    match err {
        ExtractionError::InvalidArchive(_) => {
            Some("The archive may be corrupted or truncated. Re-download it and run again.")
        }
        ExtractionError::DestinationUnavailable { .. } => Some(
            "A file with the folder's name may be in the way, or the directory is read-only.",
        ),
        ExtractionError::PathTraversal { .. } => {
            Some("This entry points outside its folder and was not extracted.")
        }
        ExtractionError::EntryWrite { .. } => {
            Some("Check free disk space and write permissions on the extraction folder.")
        }
        ExtractionError::EntryRead { .. } | ExtractionError::EntryOpen { .. } => {
            Some("The entry is damaged or uses an unsupported compression method.")
        }
        _ => None,
    }
}

/// Converts `ExtractionError` to user-friendly anyhow error with context
pub fn convert_extraction_error(err: ExtractionError, root: &Path) -> anyhow::Error {
    match err {
        ExtractionError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {}",
                root.display(),
                io_err
            )
        }
        other => {
            let hint = hint_for(&other);
            let err = anyhow::Error::from(other)
                .context(format!("Error processing '{}'", root.display()));
            match hint {
                Some(hint) => err.context(format!("HINT: {hint}")),
                None => err,
            }
        }
    }
}

/// Adds context to a core result about the processed root
pub fn add_root_context<T>(
    result: Result<T, ExtractionError>,
    root: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_extraction_error(e, root))
}
