//! Buffered copy that reports which side of the pipe failed.
//!
//! `std::io::copy` folds read and write failures into one `io::Error`. Entry
//! extraction needs to tell them apart: a read failure means the archive
//! entry is damaged, a write failure means the destination is.

use std::io;
use std::io::Read;
use std::io::Write;

/// Buffer size for entry streaming (64KB).
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Reusable fixed-size buffer for copying entry bytes.
#[derive(Debug)]
pub struct CopyBuffer {
    #[allow(clippy::large_stack_arrays)]
    buf: [u8; COPY_BUFFER_SIZE],
}

impl CopyBuffer {
    /// Creates a new zeroed copy buffer.
    #[inline]
    #[must_use]
    #[allow(clippy::large_stack_arrays)]
    pub fn new() -> Self {
        Self {
            buf: [0u8; COPY_BUFFER_SIZE],
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        COPY_BUFFER_SIZE
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Failure of one side of a copy.
#[derive(Debug)]
pub enum CopyError {
    /// The source stream failed.
    Read(io::Error),
    /// The destination stream failed.
    Write(io::Error),
}

/// Copies `reader` into `writer` through `buffer` and flushes the writer.
///
/// Returns the number of bytes copied.
///
/// # Errors
///
/// Returns `CopyError::Read` when the source fails and `CopyError::Write`
/// when writing or flushing the destination fails.
///
/// # Examples
///
/// ```
/// use zipsweep_core::io::{CopyBuffer, copy_with_buffer};
/// use std::io::Cursor;
///
/// let mut buffer = CopyBuffer::new();
/// let mut input = Cursor::new(b"flac bytes".to_vec());
/// let mut output = Vec::new();
///
/// let copied = copy_with_buffer(&mut input, &mut output, &mut buffer).unwrap();
/// assert_eq!(copied, 10);
/// assert_eq!(output, b"flac bytes");
/// ```
#[inline]
pub fn copy_with_buffer<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> Result<u64, CopyError> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };

        writer
            .write_all(&buffer.buf[..bytes_read])
            .map_err(CopyError::Write)?;

        total = total.saturating_add(bytes_read as u64);
    }

    writer.flush().map_err(CopyError::Write)?;
    Ok(total)
}
