//! Recursive archive unpacking with skip, overwrite and stale-file cleanup
//! rules.
//!
//! `zipsweep-core` walks a directory tree, extracts every zip archive it
//! finds into a sibling folder named after the archive, and optionally
//! removes obsolete files and fully extracted archives afterwards.
//!
//! Archives are processed one at a time; the entries of one archive are
//! extracted concurrently. Per-entry failures are collected without aborting
//! their siblings and disqualify the archive from removal.
//!
//! # Examples
//!
//! ```no_run
//! use zipsweep_core::UnpackConfig;
//! use zipsweep_core::unpack_tree;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = UnpackConfig::default().with_cleanup(true);
//! let report = unpack_tree("/music", &config)?;
//! println!(
//!     "{} archives, {} files written, {} skipped",
//!     report.archives_processed(),
//!     report.files_written(),
//!     report.files_skipped()
//! );
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod archive;
pub mod config;
pub mod destination;
pub mod error;
pub mod extraction;
pub mod io;
pub mod locate;
pub mod orchestrator;
pub mod pipeline;
pub mod report;

#[cfg(any(test, feature = "test-utils"))]
#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use api::unpack_tree;
pub use api::unpack_tree_with_progress;
pub use archive::ArchiveHandle;
pub use config::StaleSiblingRule;
pub use config::UnpackConfig;
pub use error::ExtractionError;
pub use error::Result;
pub use locate::ArchiveLocator;
pub use orchestrator::Orchestrator;
pub use pipeline::ArchiveFailure;
pub use pipeline::ArchivePipeline;
pub use pipeline::OpenedArchive;
pub use report::ArchiveReport;
pub use report::BatchProgress;
pub use report::BatchReport;
pub use report::EntryFailure;
pub use report::EntryOutcome;
pub use report::NoopProgress;
pub use report::SettledEntry;
