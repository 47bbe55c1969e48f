//! Per-entry skip, write and stale-sibling logic.

use std::fs;
use std::fs::File;
use std::io::BufWriter;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use crate::ExtractionError;
use crate::UnpackConfig;
use crate::archive::ArchiveHandle;
use crate::archive::EntryInfo;
use crate::archive::EntryReader;
use crate::config::StaleSiblingRule;
use crate::extraction::PendingEntries;
use crate::io::CopyBuffer;
use crate::io::CopyError;
use crate::io::copy_with_buffer;
use crate::report::EntryOutcome;

/// Launches the extraction of every entry of an open archive.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use std::sync::Arc;
/// use zipsweep_core::ArchiveHandle;
/// use zipsweep_core::UnpackConfig;
/// use zipsweep_core::extraction::EntryExtractor;
///
/// # async fn demo() -> zipsweep_core::Result<()> {
/// let extractor = EntryExtractor::new(Arc::new(UnpackConfig::default()));
/// let handle = ArchiveHandle::open("music/a.zip")?;
/// let pending = extractor.launch(&handle, Path::new("music/a"));
/// for entry in pending.settle_all().await {
///     println!("{}: {:?}", entry.name, entry.outcome);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct EntryExtractor {
    config: Arc<UnpackConfig>,
}

impl EntryExtractor {
    /// Creates an extractor bound to a run configuration.
    #[must_use]
    pub fn new(config: Arc<UnpackConfig>) -> Self {
        Self { config }
    }

    /// Starts one task per entry and returns without waiting.
    ///
    /// The skip decision for each entry is taken here, synchronously, before
    /// its task is spawned. Must be called from within a Tokio runtime.
    pub fn launch(&self, handle: &ArchiveHandle, folder: &Path) -> PendingEntries {
        let mut pending = PendingEntries::new();

        for info in handle.entries() {
            let job = EntryJob::prepare(info, folder, &self.config);
            let reader = handle.reader();
            pending.spawn(info.name.clone(), move || job.run(reader));
        }

        pending
    }
}

/// Everything an entry task needs, decided before the task starts.
#[derive(Debug)]
struct EntryJob {
    index: usize,
    name: String,
    is_dir: bool,
    destination: Result<PathBuf, PathBuf>,
    skip: bool,
    stale_rule: Option<StaleSiblingRule>,
}

impl EntryJob {
    fn prepare(info: &EntryInfo, folder: &Path, config: &UnpackConfig) -> Self {
        let destination = entry_destination(folder, &info.name);
        let skip = match &destination {
            Ok(dest) if !info.is_dir => !config.force && is_regular_file(dest),
            _ => false,
        };

        Self {
            index: info.index,
            name: info.name.clone(),
            is_dir: info.is_dir,
            destination,
            skip,
            stale_rule: config.active_stale_rule().cloned(),
        }
    }

    fn run(self, mut reader: EntryReader) -> EntryOutcome {
        let dest = match &self.destination {
            Ok(dest) => dest.clone(),
            Err(path) => {
                tracing::error!(entry = %self.name, "entry escapes its extraction folder");
                return EntryOutcome::Failed(ExtractionError::PathTraversal { path: path.clone() });
            }
        };

        if self.is_dir {
            return match fs::create_dir_all(&dest) {
                Ok(()) => EntryOutcome::Written { bytes: 0 },
                Err(source) => self.write_failed(source),
            };
        }

        let mut stream = match reader.open(self.index) {
            Ok(stream) => stream,
            Err(source) => {
                tracing::error!(entry = %self.name, error = %source, "cannot open entry stream");
                return EntryOutcome::Failed(ExtractionError::EntryOpen {
                    entry: self.name,
                    source,
                });
            }
        };

        if self.skip {
            tracing::debug!(entry = %self.name, "skipping entry");
            drop(stream);
            self.remove_stale_sibling(&dest);
            return EntryOutcome::Skipped;
        }

        tracing::debug!(entry = %self.name, "writing entry");

        if let Some(parent) = dest.parent()
            && let Err(source) = fs::create_dir_all(parent)
        {
            return self.write_failed(source);
        }

        let file = match File::create(&dest) {
            Ok(file) => file,
            Err(source) => return self.write_failed(source),
        };

        let mut writer = BufWriter::with_capacity(64 * 1024, file);
        let mut buffer = CopyBuffer::new();
        let copied = copy_with_buffer(&mut stream, &mut writer, &mut buffer);
        drop(writer);

        match copied {
            Ok(bytes) => {
                tracing::debug!(entry = %self.name, bytes, "entry written");
                self.remove_stale_sibling(&dest);
                EntryOutcome::Written { bytes }
            }
            Err(CopyError::Read(source)) => {
                tracing::error!(entry = %self.name, error = %source, "entry stream failed");
                discard_partial(&dest);
                EntryOutcome::Failed(ExtractionError::EntryRead {
                    entry: self.name,
                    source,
                })
            }
            Err(CopyError::Write(source)) => {
                discard_partial(&dest);
                self.write_failed(source)
            }
        }
    }

    fn write_failed(self, source: std::io::Error) -> EntryOutcome {
        tracing::error!(entry = %self.name, error = %source, "cannot write entry");
        EntryOutcome::Failed(ExtractionError::EntryWrite {
            entry: self.name,
            source,
        })
    }

    fn remove_stale_sibling(&self, dest: &Path) {
        if let Some(rule) = &self.stale_rule {
            remove_stale_sibling(dest, rule);
        }
    }
}

/// Deletes the stale sibling of `written` under `rule`, if there is one.
///
/// Failures, including a missing sibling, are ignored. Returns whether a
/// file was removed.
pub fn remove_stale_sibling(written: &Path, rule: &StaleSiblingRule) -> bool {
    let Some(sibling) = rule.stale_sibling(written) else {
        return false;
    };

    let removed = fs::remove_file(&sibling).is_ok();
    if removed {
        tracing::debug!(sibling = %sibling.display(), "removed stale sibling");
    }
    removed
}

/// Joins an entry name onto its extraction folder.
///
/// Names with `..`, a root or a drive prefix are rejected and returned as
/// `Err` carrying the offending name.
///
/// # Examples
///
/// ```
/// use zipsweep_core::extraction::entry_destination;
/// use std::path::{Path, PathBuf};
///
/// let folder = Path::new("/music/a");
/// assert_eq!(
///     entry_destination(folder, "disc1/01.flac"),
///     Ok(PathBuf::from("/music/a/disc1/01.flac"))
/// );
/// assert!(entry_destination(folder, "../../etc/passwd").is_err());
/// ```
pub fn entry_destination(folder: &Path, name: &str) -> Result<PathBuf, PathBuf> {
    let mut dest = folder.to_path_buf();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => dest.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(PathBuf::from(name));
            }
        }
    }
    Ok(dest)
}

fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| meta.is_file())
}

fn discard_partial(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        tracing::debug!(path = %path.display(), error = %err, "cannot remove partial file");
    }
}
