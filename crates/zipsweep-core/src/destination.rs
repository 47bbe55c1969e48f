//! Extraction folder resolution.
//!
//! Every archive is unpacked into a sibling folder named after the archive
//! without its extension: `music/a.zip` goes to `music/a/`.

use std::io;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;

/// Computes the extraction folder for `archive` without touching the
/// filesystem.
///
/// # Examples
///
/// ```
/// use zipsweep_core::destination::extraction_folder;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     extraction_folder(Path::new("/music/album.zip")),
///     PathBuf::from("/music/album")
/// );
/// ```
#[must_use]
pub fn extraction_folder(archive: &Path) -> PathBuf {
    let stem = archive.file_stem().unwrap_or_else(|| archive.as_os_str());
    archive
        .parent()
        .map_or_else(|| PathBuf::from(stem), |parent| parent.join(stem))
}

/// Ensures the extraction folder for `archive` exists and returns it.
///
/// The folder is stat'ed first; if that fails for any reason, it is created.
/// A concurrent creation (`AlreadyExists`) is not an error.
///
/// # Errors
///
/// Returns `DestinationUnavailable` if the folder cannot be created, or if
/// the path exists but is not a directory.
pub async fn ensure_extraction_folder(archive: &Path) -> Result<PathBuf> {
    let folder = extraction_folder(archive);

    match tokio::fs::metadata(&folder).await {
        Ok(meta) if meta.is_dir() => return Ok(folder),
        Ok(_) => {
            return Err(ExtractionError::DestinationUnavailable {
                source: io::Error::new(io::ErrorKind::AlreadyExists, "path exists and is not a directory"),
                path: folder,
            });
        }
        Err(_) => {}
    }

    match tokio::fs::create_dir(&folder).await {
        Ok(()) => {
            tracing::debug!(folder = %folder.display(), "created extraction folder");
            Ok(folder)
        }
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => Ok(folder),
        Err(source) => Err(ExtractionError::DestinationUnavailable {
            path: folder,
            source,
        }),
    }
}
