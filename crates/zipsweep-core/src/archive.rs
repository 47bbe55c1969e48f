//! Open ZIP archive handle.

use std::path::Path;
use std::path::PathBuf;

use zip::ZipArchive;

use crate::ExtractionError;
use crate::Result;
use crate::io::SharedFile;

/// Metadata for one entry of an open archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    /// Position of the entry in the central directory.
    pub index: usize,

    /// Entry name as stored in the archive.
    pub name: String,

    /// Whether the entry is a directory record.
    pub is_dir: bool,

    /// Declared uncompressed size in bytes.
    pub size: u64,
}

/// An open archive whose entry index has been fully read.
///
/// The handle can hand out independent readers to concurrent entry tasks
/// (see [`ArchiveHandle::reader`]); they all share the same file descriptor
/// and the same parsed index. Closing consumes the handle, so an archive is
/// closed exactly once.
#[derive(Debug)]
pub struct ArchiveHandle {
    path: PathBuf,
    archive: ZipArchive<SharedFile>,
    entries: Vec<EntryInfo>,
}

impl ArchiveHandle {
    /// Opens `path` and reads its central directory and entry metadata.
    ///
    /// This performs blocking I/O. Async callers should run it through
    /// [`ArchiveHandle::open_async`].
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be opened and `InvalidArchive` if the
    /// index is malformed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = SharedFile::open(path)?;
        let mut archive = ZipArchive::new(file)?;
        let entries = read_index(&mut archive);
        Ok(Self {
            path: path.to_path_buf(),
            archive,
            entries,
        })
    }

    /// Opens `path` on the blocking pool and resolves once the index is read.
    ///
    /// # Errors
    ///
    /// See [`ArchiveHandle::open`].
    pub async fn open_async(path: PathBuf) -> Result<Self> {
        let display = path.display().to_string();
        tokio::task::spawn_blocking(move || Self::open(path))
            .await
            .map_err(|join| {
                ExtractionError::InvalidArchive(format!("opening {display} aborted: {join}"))
            })?
    }

    /// Returns the archive path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of entries in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Returns `true` if the archive holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// Returns metadata for every entry, in index order.
    #[must_use]
    pub fn entries(&self) -> &[EntryInfo] {
        &self.entries
    }

    /// Returns an independent reader over this archive for one entry task.
    ///
    /// The reader shares the parsed index and file descriptor; its cursor is
    /// private.
    #[must_use]
    pub fn reader(&self) -> EntryReader {
        EntryReader {
            archive: self.archive.clone(),
        }
    }

    /// Returns the number of entry readers still alive.
    ///
    /// Drops to zero once every entry task has finished.
    #[must_use]
    pub fn open_readers(&self) -> usize {
        // the temporary clone and the handle itself hold one reference each
        self.archive.clone().into_inner().handle_count().saturating_sub(2)
    }

    /// Closes the archive.
    pub fn close(self) {
        let open = self.open_readers();
        if open > 0 {
            tracing::warn!(archive = %self.path.display(), open, "closing archive with live readers");
        } else {
            tracing::debug!(archive = %self.path.display(), "closing archive");
        }
        drop(self.archive);
    }
}

/// Reads metadata for every entry, in index order.
///
/// Entries whose local header cannot be read are still listed by name from
/// the central directory so that their failure surfaces when the entry is
/// streamed.
fn read_index(archive: &mut ZipArchive<SharedFile>) -> Vec<EntryInfo> {
    (0..archive.len())
        .filter_map(|index| {
            let name = archive.name_for_index(index)?.to_owned();
            let (is_dir, size) = archive
                .by_index_raw(index)
                .map_or_else(|_| (name.ends_with('/'), 0), |f| (f.is_dir(), f.size()));
            Some(EntryInfo {
                index,
                name,
                is_dir,
                size,
            })
        })
        .collect()
}

/// Per-task view of an open archive.
pub struct EntryReader {
    archive: ZipArchive<SharedFile>,
}

impl EntryReader {
    /// Opens the decompressing stream for the entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns the archive error if the local header or compression method
    /// cannot be handled.
    pub fn open(&mut self, index: usize) -> zip::result::ZipResult<impl std::io::Read + '_> {
        self.archive.by_index(index)
    }
}
