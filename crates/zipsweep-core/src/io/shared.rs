//! Cloneable positional reader over one open file.
//!
//! Concurrent entry tasks each need their own read cursor into the same
//! archive. `SharedFile` keeps a single descriptor behind an `Arc` and
//! tracks the cursor per clone, issuing positional reads (`pread` on Unix,
//! `seek_read` on Windows) so clones never disturb each other.

use std::fs::File;
use std::io;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::path::Path;
use std::sync::Arc;

/// A `Read + Seek` handle sharing one file descriptor across clones.
///
/// # Examples
///
/// ```no_run
/// use zipsweep_core::io::SharedFile;
/// use std::io::Read;
///
/// let mut first = SharedFile::open("album.zip")?;
/// let mut second = first.clone();
///
/// let mut a = [0u8; 4];
/// let mut b = [0u8; 4];
/// first.read_exact(&mut a)?;
/// second.read_exact(&mut b)?;
/// assert_eq!(a, b);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SharedFile {
    file: Arc<File>,
    len: u64,
    pos: u64,
}

impl SharedFile {
    /// Opens `path` for shared positional reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its length read.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        Ok(Self {
            file: Arc::new(file),
            len,
            pos: 0,
        })
    }

    /// Returns the file length captured at open time.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns `true` if the file was empty at open time.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of live handles sharing the descriptor.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.file)
    }

    #[cfg(unix)]
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        use std::os::unix::fs::FileExt;
        self.file.read_at(buf, offset)
    }

    #[cfg(windows)]
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<usize> {
        use std::os::windows::fs::FileExt;
        self.file.seek_read(buf, offset)
    }
}

impl Read for SharedFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.len {
            return Ok(0);
        }
        let n = self.read_at(buf, self.pos)?;
        self.pos += n as u64;
        Ok(n)
    }
}

impl Seek for SharedFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => self.len.checked_add_signed(delta),
            SeekFrom::Current(delta) => self.pos.checked_add_signed(delta),
        };

        match target {
            Some(offset) => {
                self.pos = offset;
                Ok(offset)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )),
        }
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.pos)
    }
}
