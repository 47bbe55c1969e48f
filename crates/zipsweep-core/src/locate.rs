//! Lazy discovery of archive files under a root directory.

use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::UnpackConfig;

/// Depth-first iterator over every archive file below a root directory.
///
/// The walk is lazy: directories are only read as the iterator advances.
/// Directories that cannot be read are skipped and the walk continues with
/// their siblings. When the root itself is inaccessible the sequence is
/// empty. Symbolic links are not followed, so each file is yielded at most
/// once.
///
/// # Examples
///
/// ```no_run
/// use zipsweep_core::ArchiveLocator;
/// use zipsweep_core::UnpackConfig;
///
/// let config = UnpackConfig::default();
/// for archive in ArchiveLocator::new("/music", &config) {
///     println!("found {}", archive.display());
/// }
/// ```
pub struct ArchiveLocator {
    walker: walkdir::IntoIter,
    config: UnpackConfig,
}

impl ArchiveLocator {
    /// Creates a locator rooted at `root`, matching the configured archive
    /// extension.
    #[must_use]
    pub fn new(root: impl AsRef<Path>, config: &UnpackConfig) -> Self {
        let walker = WalkDir::new(root.as_ref())
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        Self {
            walker,
            config: config.clone(),
        }
    }

    fn matches(&self, entry: &walkdir::DirEntry) -> bool {
        entry.file_type().is_file() && self.config.is_archive(entry.path())
    }
}

impl Iterator for ArchiveLocator {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            match self.walker.next()? {
                Ok(entry) if self.matches(&entry) => return Some(entry.into_path()),
                Ok(_) => {}
                Err(err) => {
                    // walkdir already moved past the failing directory
                    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                    tracing::debug!(path = %path.display(), error = %err, "cannot access path");
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_finds_nested_archives() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("a.zip"));
        touch(&temp.path().join("music/b.zip"));
        touch(&temp.path().join("music/deep/er/c.ZIP"));
        touch(&temp.path().join("music/notes.txt"));

        let config = UnpackConfig::default();
        let found: Vec<PathBuf> = ArchiveLocator::new(temp.path(), &config).collect();

        assert_eq!(found.len(), 3);
        assert!(found.contains(&temp.path().join("a.zip")));
        assert!(found.contains(&temp.path().join("music/b.zip")));
        assert!(found.contains(&temp.path().join("music/deep/er/c.ZIP")));
    }

    #[test]
    fn test_directory_named_like_archive_is_not_yielded() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("fake.zip")).unwrap();
        touch(&temp.path().join("fake.zip/real.zip"));

        let config = UnpackConfig::default();
        let found: Vec<PathBuf> = ArchiveLocator::new(temp.path(), &config).collect();

        assert_eq!(found, vec![temp.path().join("fake.zip/real.zip")]);
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let temp = TempDir::new().unwrap();
        let config = UnpackConfig::default();
        let mut locator = ArchiveLocator::new(temp.path().join("missing"), &config);
        assert!(locator.next().is_none());
    }

    #[test]
    fn test_yields_in_name_order() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join("1.zip"));
        touch(&temp.path().join("2.zip"));

        let config = UnpackConfig::default();
        let mut locator = ArchiveLocator::new(temp.path(), &config);
        assert_eq!(locator.next(), Some(temp.path().join("1.zip")));
        assert_eq!(locator.next(), Some(temp.path().join("2.zip")));
        assert_eq!(locator.next(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_does_not_stop_siblings() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let locked = temp.path().join("a_locked");
        touch(&locked.join("hidden.zip"));
        touch(&temp.path().join("b_open/visible.zip"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // Root can read anything; only assert the exclusion for regular users
        let enforced = fs::read_dir(&locked).is_err();

        let config = UnpackConfig::default();
        let found: Vec<PathBuf> = ArchiveLocator::new(temp.path(), &config).collect();

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(found.contains(&temp.path().join("b_open/visible.zip")));
        if enforced {
            assert!(!found.contains(&locked.join("hidden.zip")));
        }
    }
}
