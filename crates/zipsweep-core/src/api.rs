//! High-level blocking API.

use std::path::Path;

use crate::BatchProgress;
use crate::BatchReport;
use crate::NoopProgress;
use crate::Orchestrator;
use crate::Result;
use crate::UnpackConfig;

/// Unpacks every archive below `root`.
///
/// Builds a single-threaded runtime for the duration of the call.
///
/// # Errors
///
/// Returns an error only if the runtime cannot be created. Per-archive and
/// per-entry failures are recorded in the returned report.
///
/// # Examples
///
/// ```no_run
/// use zipsweep_core::UnpackConfig;
/// use zipsweep_core::unpack_tree;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = UnpackConfig::default().with_cleanup(true);
/// let report = unpack_tree("/music", &config)?;
/// println!("Wrote {} files", report.files_written());
/// # Ok(())
/// # }
/// ```
pub fn unpack_tree<P: AsRef<Path>>(root: P, config: &UnpackConfig) -> Result<BatchReport> {
    let mut noop = NoopProgress;
    unpack_tree_with_progress(root, config, &mut noop)
}

/// Unpacks every archive below `root`, reporting progress as it goes.
///
/// # Errors
///
/// Returns an error only if the runtime cannot be created.
pub fn unpack_tree_with_progress<P: AsRef<Path>>(
    root: P,
    config: &UnpackConfig,
    progress: &mut dyn BatchProgress,
) -> Result<BatchReport> {
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let orchestrator = Orchestrator::new(config.clone());
    Ok(runtime.block_on(orchestrator.run(root.as_ref(), progress)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::write_test_zip;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_unpack_tree_end_to_end() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("music")).unwrap();
        write_test_zip(&temp.path().join("music/a.zip"), &[("1.flac", "one")]);

        let report = unpack_tree(temp.path(), &UnpackConfig::default()).unwrap();

        assert_eq!(report.files_written(), 1);
        assert!(temp.path().join("music/a/1.flac").is_file());
        assert!(temp.path().join("music/a.zip").exists());
    }

    #[test]
    fn test_empty_root() {
        let temp = TempDir::new().unwrap();
        let report = unpack_tree(temp.path(), &UnpackConfig::default()).unwrap();
        assert_eq!(report.archives_processed(), 0);
        assert!(!report.has_failures());
    }
}
