//! Archive pipeline: locate, resolve destination, open, launch entries.

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use crate::ArchiveHandle;
use crate::ArchiveLocator;
use crate::ExtractionError;
use crate::UnpackConfig;
use crate::destination::ensure_extraction_folder;
use crate::extraction::EntryExtractor;
use crate::extraction::PendingEntries;

/// An archive whose entries are being extracted.
pub struct OpenedArchive {
    /// Source archive path.
    pub path: PathBuf,

    /// Extraction folder beside the archive.
    pub folder: PathBuf,

    /// Open handle; must be closed once `pending` has settled.
    pub handle: ArchiveHandle,

    /// In-flight entry extractions.
    pub pending: PendingEntries,
}

/// An archive that could not be prepared.
#[derive(Debug)]
pub struct ArchiveFailure {
    /// Source archive path.
    pub path: PathBuf,

    /// Why it could not be prepared.
    pub error: ExtractionError,
}

/// Lazy sequence of opened archives under a root directory.
///
/// Nothing happens until [`ArchivePipeline::next_archive`] is awaited; each
/// call pulls exactly one archive path from the locator, prepares its
/// extraction folder, reads the archive index and launches its entries.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use zipsweep_core::ArchivePipeline;
/// use zipsweep_core::UnpackConfig;
///
/// # async fn demo() {
/// let mut pipeline = ArchivePipeline::new("/music", Arc::new(UnpackConfig::default()));
/// while let Some(next) = pipeline.next_archive().await {
///     match next {
///         Ok(opened) => {
///             let settled = opened.pending.settle_all().await;
///             opened.handle.close();
///             println!("{} entries", settled.len());
///         }
///         Err(failure) => eprintln!("{}: {}", failure.path.display(), failure.error),
///     }
/// }
/// # }
/// ```
pub struct ArchivePipeline {
    locator: ArchiveLocator,
    extractor: EntryExtractor,
}

impl ArchivePipeline {
    /// Creates a pipeline over every archive below `root`.
    #[must_use]
    pub fn new(root: impl AsRef<Path>, config: Arc<UnpackConfig>) -> Self {
        Self {
            locator: ArchiveLocator::new(root, &config),
            extractor: EntryExtractor::new(config),
        }
    }

    /// Prepares the next archive, or returns `None` when traversal is done.
    ///
    /// Must be awaited inside a Tokio runtime.
    pub async fn next_archive(&mut self) -> Option<Result<OpenedArchive, ArchiveFailure>> {
        let path = self.locator.next()?;
        Some(self.prepare(path).await)
    }

    async fn prepare(&self, path: PathBuf) -> Result<OpenedArchive, ArchiveFailure> {
        let folder = match ensure_extraction_folder(&path).await {
            Ok(folder) => folder,
            Err(error) => {
                tracing::error!(archive = %path.display(), %error, "cannot prepare extraction folder");
                return Err(ArchiveFailure { path, error });
            }
        };

        let handle = match ArchiveHandle::open_async(path.clone()).await {
            Ok(handle) => handle,
            Err(error) => {
                tracing::error!(archive = %path.display(), %error, "cannot open archive");
                return Err(ArchiveFailure { path, error });
            }
        };

        let pending = self.extractor.launch(&handle, &folder);
        tracing::debug!(archive = %path.display(), entries = pending.len(), "entries launched");

        Ok(OpenedArchive {
            path,
            folder,
            handle,
            pending,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::write_test_zip;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_yields_one_archive_at_a_time() {
        let temp = TempDir::new().unwrap();
        write_test_zip(&temp.path().join("a.zip"), &[("1.flac", "a1")]);
        write_test_zip(&temp.path().join("b.zip"), &[("1.flac", "b1")]);

        let mut pipeline = ArchivePipeline::new(temp.path(), Arc::new(UnpackConfig::default()));

        let first = pipeline.next_archive().await.unwrap().unwrap();
        assert_eq!(first.path, temp.path().join("a.zip"));
        assert_eq!(first.folder, temp.path().join("a"));
        // the second archive has not been touched yet
        assert!(!temp.path().join("b").exists());

        first.pending.settle_all().await;
        first.handle.close();

        let second = pipeline.next_archive().await.unwrap().unwrap();
        assert_eq!(second.path, temp.path().join("b.zip"));
        second.pending.settle_all().await;
        second.handle.close();

        assert!(pipeline.next_archive().await.is_none());
        assert_eq!(fs::read(temp.path().join("b/1.flac")).unwrap(), b"b1");
    }

    #[tokio::test]
    async fn test_corrupt_archive_is_reported_and_traversal_continues() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.zip"), b"definitely not a zip").unwrap();
        write_test_zip(&temp.path().join("b.zip"), &[("1.flac", "b1")]);

        let mut pipeline = ArchivePipeline::new(temp.path(), Arc::new(UnpackConfig::default()));

        let failure = pipeline.next_archive().await.unwrap().err().unwrap();
        assert_eq!(failure.path, temp.path().join("a.zip"));
        assert!(matches!(failure.error, ExtractionError::InvalidArchive(_)));

        let next = pipeline.next_archive().await.unwrap().unwrap();
        assert_eq!(next.path, temp.path().join("b.zip"));
        next.pending.settle_all().await;
        next.handle.close();
    }
}
