//! Error types for archive unpacking operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Errors that can occur while locating, opening or unpacking archives.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive is corrupted or its entry index could not be read.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// The extraction folder beside an archive could not be created.
    #[error("cannot prepare extraction folder {path}: {source}")]
    DestinationUnavailable {
        /// The folder that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// An entry name resolves outside of its extraction folder.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The entry name as stored in the archive.
        path: PathBuf,
    },

    /// The read stream for an entry could not be opened.
    #[error("cannot open entry {entry}: {source}")]
    EntryOpen {
        /// Entry name inside the archive.
        entry: String,
        /// Underlying archive error.
        source: zip::result::ZipError,
    },

    /// Reading decompressed entry bytes failed mid-stream.
    #[error("read error in entry {entry}: {source}")]
    EntryRead {
        /// Entry name inside the archive.
        entry: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// Creating or writing the destination file failed.
    #[error("write error for entry {entry}: {source}")]
    EntryWrite {
        /// Entry name inside the archive.
        entry: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The task extracting an entry ended without producing an outcome.
    #[error("extraction task for {entry} aborted: {reason}")]
    TaskAborted {
        /// Entry name inside the archive.
        entry: String,
        /// Panic or cancellation message.
        reason: String,
    },
}

impl From<zip::result::ZipError> for ExtractionError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => Self::Io(io),
            other => Self::InvalidArchive(other.to_string()),
        }
    }
}
