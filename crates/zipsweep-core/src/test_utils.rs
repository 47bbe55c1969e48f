//! Test utilities for building zip fixtures on disk.
//!
//! # Panics
//!
//! All functions in this module panic on I/O errors since they are designed
//! for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::fs::File;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;

use zip::CompressionMethod;
use zip::write::SimpleFileOptions;
use zip::write::ZipWriter;

/// Writes a zip archive at `path` from `(name, content)` pairs.
///
/// Names ending in `/` become directory entries. File entries are deflated.
///
/// # Examples
///
/// ```
/// use zipsweep_core::test_utils::write_test_zip;
///
/// let dir = tempfile::tempdir().unwrap();
/// let path = dir.path().join("album.zip");
/// write_test_zip(&path, &[("01.flac", "one"), ("scans/", "")]);
/// assert!(path.exists());
/// ```
pub fn write_test_zip(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    append_entries(&mut zip, entries, CompressionMethod::Deflated);
    zip.finish().unwrap();
}

/// Builds an in-memory zip archive from `(name, content)` pairs, stored
/// uncompressed.
#[must_use]
pub fn create_test_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    append_entries(&mut zip, entries, CompressionMethod::Stored);
    zip.finish().unwrap().into_inner()
}

/// Writes a zip archive at `path` whose entry `broken` has its compressed
/// data corrupted, so that streaming it fails mid-read.
///
/// The other entries stay intact.
pub fn write_zip_with_corrupt_entry(path: &Path, entries: &[(&str, &str)], broken: &str) {
    let mut bytes = create_test_zip(entries);

    let (_, content) = entries
        .iter()
        .find(|(name, _)| *name == broken)
        .unwrap();
    let needle = content.as_bytes();
    let start = bytes
        .windows(needle.len())
        .position(|window| window == needle)
        .unwrap();
    for byte in &mut bytes[start..start + needle.len()] {
        *byte ^= 0xFF;
    }

    std::fs::write(path, bytes).unwrap();
}

/// Writes a zip archive at `path` whose entry `target` declares compression
/// method 12 (bzip2) in both its local and central headers.
///
/// The archive index stays readable, but opening the entry stream fails
/// because that method is not enabled.
pub fn write_zip_with_unsupported_method(path: &Path, entries: &[(&str, &str)], target: &str) {
    const LOCAL_SIG: [u8; 4] = [0x50, 0x4b, 0x03, 0x04];
    const CENTRAL_SIG: [u8; 4] = [0x50, 0x4b, 0x01, 0x02];
    const BZIP2: [u8; 2] = 12u16.to_le_bytes();

    let mut bytes = create_test_zip(entries);
    let name = target.as_bytes();
    let mut patched = 0;

    // (signature, method offset, name length offset, name offset)
    for (sig, method_at, len_at, name_at) in [(LOCAL_SIG, 8, 26, 30), (CENTRAL_SIG, 10, 28, 46)] {
        let mut i = 0;
        while i + name_at <= bytes.len() {
            if bytes[i..i + 4] == sig {
                let len = usize::from(u16::from_le_bytes([bytes[i + len_at], bytes[i + len_at + 1]]));
                if bytes.get(i + name_at..i + name_at + len) == Some(name) {
                    bytes[i + method_at..i + method_at + 2].copy_from_slice(&BZIP2);
                    patched += 1;
                }
            }
            i += 1;
        }
    }
    assert_eq!(patched, 2, "entry {target} not found in both headers");

    std::fs::write(path, bytes).unwrap();
}

fn append_entries<W: Write + std::io::Seek>(
    zip: &mut ZipWriter<W>,
    entries: &[(&str, &str)],
    method: CompressionMethod,
) {
    let options = SimpleFileOptions::default()
        .compression_method(method)
        .unix_permissions(0o644);

    for (name, content) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_zip_is_readable() {
        let data = create_test_zip(&[("a.flac", "alpha"), ("dir/", "")]);
        let archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 2);
    }
}
