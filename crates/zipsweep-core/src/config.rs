//! Run configuration for archive unpacking.

use std::path::Path;

/// Extension pair used to detect stale duplicates after extraction.
///
/// Once a file with the `primary` extension has been extracted (or found
/// already present), a sibling with the same stem and the `secondary`
/// extension is considered obsolete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleSiblingRule {
    /// Extension of freshly extracted files, without the leading dot.
    pub primary: String,

    /// Extension of the obsolete sibling, without the leading dot.
    pub secondary: String,
}

impl Default for StaleSiblingRule {
    /// `flac` files replace `mp3` files.
    fn default() -> Self {
        Self {
            primary: "flac".to_string(),
            secondary: "mp3".to_string(),
        }
    }
}

impl StaleSiblingRule {
    /// Creates a rule from a primary and a secondary extension.
    ///
    /// Leading dots are stripped, so `".flac"` and `"flac"` are equivalent.
    #[must_use]
    pub fn new(primary: impl AsRef<str>, secondary: impl AsRef<str>) -> Self {
        Self {
            primary: primary.as_ref().trim_start_matches('.').to_string(),
            secondary: secondary.as_ref().trim_start_matches('.').to_string(),
        }
    }

    /// Returns the stale sibling of `path`, if `path` has the primary
    /// extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipsweep_core::StaleSiblingRule;
    /// use std::path::{Path, PathBuf};
    ///
    /// let rule = StaleSiblingRule::default();
    /// assert_eq!(
    ///     rule.stale_sibling(Path::new("album/song.flac")),
    ///     Some(PathBuf::from("album/song.mp3"))
    /// );
    /// assert_eq!(rule.stale_sibling(Path::new("album/cover.jpg")), None);
    /// ```
    #[must_use]
    pub fn stale_sibling(&self, path: &Path) -> Option<std::path::PathBuf> {
        let ext = path.extension()?.to_str()?;
        (ext == self.primary).then(|| path.with_extension(&self.secondary))
    }
}

/// Immutable configuration shared by every stage of a run.
///
/// Built once at startup and passed by reference to the pipeline; entry
/// tasks receive it through an `Arc`.
///
/// # Examples
///
/// ```
/// use zipsweep_core::UnpackConfig;
///
/// let config = UnpackConfig::default().with_force(true).with_cleanup(true);
/// assert!(config.force);
/// assert!(config.cleanup);
/// assert_eq!(config.archive_extension, "zip");
/// ```
#[derive(Debug, Clone)]
pub struct UnpackConfig {
    /// Overwrite destination files that already exist.
    pub force: bool,

    /// Delete stale siblings and fully extracted source archives.
    pub cleanup: bool,

    /// Report per-entry progress.
    pub verbose: bool,

    /// Extension identifying archives during traversal, without the dot.
    pub archive_extension: String,

    /// Stale sibling rule applied when `cleanup` is set. `None` disables it.
    pub stale_sibling: Option<StaleSiblingRule>,
}

impl Default for UnpackConfig {
    fn default() -> Self {
        Self {
            force: false,
            cleanup: false,
            verbose: false,
            archive_extension: "zip".to_string(),
            stale_sibling: Some(StaleSiblingRule::default()),
        }
    }
}

impl UnpackConfig {
    /// Sets the overwrite flag.
    #[must_use]
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Sets the cleanup flag.
    #[must_use]
    pub fn with_cleanup(mut self, cleanup: bool) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Sets the verbose flag.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Sets the archive extension. A leading dot is ignored.
    #[must_use]
    pub fn with_archive_extension(mut self, extension: impl AsRef<str>) -> Self {
        self.archive_extension = extension.as_ref().trim_start_matches('.').to_string();
        self
    }

    /// Replaces the stale sibling rule.
    #[must_use]
    pub fn with_stale_sibling(mut self, rule: Option<StaleSiblingRule>) -> Self {
        self.stale_sibling = rule;
        self
    }

    /// Returns whether `path` carries the archive extension.
    ///
    /// Comparison is case-insensitive so `ALBUM.ZIP` is found as well.
    #[must_use]
    pub fn is_archive(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.archive_extension))
    }

    /// Returns the rule to apply after each entry, if cleanup is enabled.
    #[must_use]
    pub fn active_stale_rule(&self) -> Option<&StaleSiblingRule> {
        if self.cleanup {
            self.stale_sibling.as_ref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config() {
        let config = UnpackConfig::default();
        assert!(!config.force);
        assert!(!config.cleanup);
        assert!(!config.verbose);
        assert_eq!(config.archive_extension, "zip");
        assert_eq!(config.stale_sibling, Some(StaleSiblingRule::default()));
    }

    #[test]
    fn test_is_archive_case_insensitive() {
        let config = UnpackConfig::default();
        assert!(config.is_archive(Path::new("music/a.zip")));
        assert!(config.is_archive(Path::new("music/A.ZIP")));
        assert!(!config.is_archive(Path::new("music/a.zip.part")));
        assert!(!config.is_archive(Path::new("music/zip")));
    }

    #[test]
    fn test_custom_archive_extension_strips_dot() {
        let config = UnpackConfig::default().with_archive_extension(".cbz");
        assert_eq!(config.archive_extension, "cbz");
        assert!(config.is_archive(Path::new("comics/issue1.cbz")));
    }

    #[test]
    fn test_stale_rule_requires_cleanup() {
        let config = UnpackConfig::default();
        assert!(config.active_stale_rule().is_none());

        let config = config.with_cleanup(true);
        assert!(config.active_stale_rule().is_some());

        let config = config.with_stale_sibling(None);
        assert!(config.active_stale_rule().is_none());
    }

    #[test]
    fn test_stale_sibling_only_for_primary() {
        let rule = StaleSiblingRule::new(".flac", ".mp3");
        assert_eq!(rule.primary, "flac");
        assert_eq!(
            rule.stale_sibling(Path::new("/a/b/track 01.flac")),
            Some(PathBuf::from("/a/b/track 01.mp3"))
        );
        assert_eq!(rule.stale_sibling(Path::new("/a/b/track.mp3")), None);
        assert_eq!(rule.stale_sibling(Path::new("/a/b/noext")), None);
    }
}
