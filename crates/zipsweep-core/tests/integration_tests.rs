//! Integration tests for zipsweep-core.
//!
//! These tests verify end-to-end runs with real filesystem operations.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tempfile::TempDir;
use zipsweep_core::EntryOutcome;
use zipsweep_core::ExtractionError;
use zipsweep_core::StaleSiblingRule;
use zipsweep_core::UnpackConfig;
use zipsweep_core::test_utils::write_test_zip;
use zipsweep_core::test_utils::write_zip_with_corrupt_entry;
use zipsweep_core::unpack_tree;

fn music_root() -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("failed to create temp dir");
    let music = temp.path().join("music");
    fs::create_dir_all(&music).unwrap();
    (temp, music)
}

fn modified(path: &Path) -> std::time::SystemTime {
    fs::metadata(path).unwrap().modified().unwrap()
}

#[test]
fn test_first_run_extracts_and_keeps_archive() {
    let (temp, music) = music_root();
    write_test_zip(&music.join("a.zip"), &[("1.flac", "one"), ("2.flac", "two")]);

    let report = unpack_tree(temp.path(), &UnpackConfig::default()).unwrap();

    assert_eq!(report.archives_processed(), 1);
    assert_eq!(report.files_written(), 2);
    assert_eq!(fs::read(music.join("a/1.flac")).unwrap(), b"one");
    assert_eq!(fs::read(music.join("a/2.flac")).unwrap(), b"two");
    assert!(music.join("a.zip").exists());
}

#[test]
fn test_second_run_with_cleanup_removes_stale_mp3_and_archive() {
    let (temp, music) = music_root();
    write_test_zip(&music.join("a.zip"), &[("1.flac", "one"), ("2.flac", "two")]);

    unpack_tree(temp.path(), &UnpackConfig::default()).unwrap();
    fs::write(music.join("a/1.mp3"), b"lossy").unwrap();

    let config = UnpackConfig::default().with_cleanup(true);
    let report = unpack_tree(temp.path(), &config).unwrap();

    assert_eq!(report.files_skipped(), 2);
    assert_eq!(report.files_written(), 0);
    assert!(!music.join("a/1.mp3").exists());
    assert!(!music.join("a.zip").exists());
    assert!(music.join("a/1.flac").exists());
    assert!(report.archives[0].removed);
}

#[test]
fn test_skip_preserves_original_bytes_unless_forced() {
    let (temp, music) = music_root();
    write_test_zip(&music.join("a.zip"), &[("A.flac", "archived A"), ("B.flac", "archived B")]);
    fs::create_dir_all(music.join("a")).unwrap();
    fs::write(music.join("a/A.flac"), b"local A").unwrap();

    unpack_tree(temp.path(), &UnpackConfig::default()).unwrap();
    assert_eq!(fs::read(music.join("a/A.flac")).unwrap(), b"local A");
    assert_eq!(fs::read(music.join("a/B.flac")).unwrap(), b"archived B");

    let report = unpack_tree(temp.path(), &UnpackConfig::default().with_force(true)).unwrap();
    assert_eq!(report.files_written(), 2);
    assert_eq!(fs::read(music.join("a/A.flac")).unwrap(), b"archived A");
}

#[test]
fn test_cleanup_without_stale_sibling_is_not_an_error() {
    let (temp, music) = music_root();
    write_test_zip(&music.join("a.zip"), &[("song.flac", "lossless")]);

    let report = unpack_tree(temp.path(), &UnpackConfig::default().with_cleanup(true)).unwrap();

    assert!(!report.has_failures());
    assert!(music.join("a/song.flac").exists());
}

#[test]
fn test_stale_sibling_removed_after_write() {
    let (temp, music) = music_root();
    write_test_zip(&music.join("a.zip"), &[("song.flac", "lossless"), ("cover.jpg", "jpeg")]);
    fs::create_dir_all(music.join("a")).unwrap();
    fs::write(music.join("a/song.mp3"), b"lossy").unwrap();
    fs::write(music.join("a/cover.mp3"), b"not a duplicate of anything extracted").unwrap();

    unpack_tree(temp.path(), &UnpackConfig::default().with_cleanup(true)).unwrap();

    assert!(!music.join("a/song.mp3").exists());
    assert!(music.join("a/cover.mp3").exists());
}

#[test]
fn test_custom_stale_rule() {
    let (temp, music) = music_root();
    write_test_zip(&music.join("a.zip"), &[("track.wav", "pcm")]);
    fs::create_dir_all(music.join("a")).unwrap();
    fs::write(music.join("a/track.ogg"), b"vorbis").unwrap();

    let config = UnpackConfig::default()
        .with_cleanup(true)
        .with_stale_sibling(Some(StaleSiblingRule::new("wav", "ogg")));
    unpack_tree(temp.path(), &config).unwrap();

    assert!(!music.join("a/track.ogg").exists());
}

#[test]
fn test_corrupt_entry_keeps_archive_and_siblings_complete() {
    let (temp, music) = music_root();
    let archive = music.join("a.zip");
    write_zip_with_corrupt_entry(
        &archive,
        &[
            ("1.flac", "first track payload"),
            ("2.flac", "SECOND-TRACK-PAYLOAD-THAT-BREAKS"),
            ("3.flac", "third track payload"),
        ],
        "2.flac",
    );

    let report = unpack_tree(temp.path(), &UnpackConfig::default().with_cleanup(true)).unwrap();
    let archive_report = &report.archives[0];

    assert!(archive.exists());
    assert!(!archive_report.removed);
    assert_eq!(archive_report.failures.len(), 1);
    assert_eq!(archive_report.failures[0].name, "2.flac");
    assert!(matches!(
        archive_report.failures[0].error,
        ExtractionError::EntryRead { .. }
    ));
    assert_eq!(fs::read(music.join("a/1.flac")).unwrap(), b"first track payload");
    assert_eq!(fs::read(music.join("a/3.flac")).unwrap(), b"third track payload");
    // the partial file is discarded so the next run retries it
    assert!(!music.join("a/2.flac").exists());
}

#[test]
fn test_second_run_is_idempotent() {
    let (temp, music) = music_root();
    write_test_zip(&music.join("a.zip"), &[("1.flac", "one"), ("2.flac", "two")]);
    fs::create_dir_all(music.join("nested/deeper")).unwrap();
    write_test_zip(&music.join("nested/deeper/b.zip"), &[("x.flac", "x")]);

    unpack_tree(temp.path(), &UnpackConfig::default()).unwrap();
    let before = modified(&music.join("a/1.flac"));

    let report = unpack_tree(temp.path(), &UnpackConfig::default()).unwrap();

    assert_eq!(report.files_written(), 0);
    assert_eq!(report.files_skipped(), 3);
    assert_eq!(modified(&music.join("a/1.flac")), before);
    assert!(music.join("a.zip").exists());
    assert!(music.join("nested/deeper/b.zip").exists());
}

#[test]
fn test_corrupt_archive_does_not_stop_the_run() {
    let (temp, music) = music_root();
    fs::write(music.join("a.zip"), b"PK but not really").unwrap();
    write_test_zip(&music.join("b.zip"), &[("1.flac", "one")]);

    let report = unpack_tree(temp.path(), &UnpackConfig::default().with_cleanup(true)).unwrap();

    assert_eq!(report.archives_processed(), 2);
    assert_eq!(report.failed_archives(), 1);
    assert!(music.join("a.zip").exists());
    assert!(!music.join("b.zip").exists());
    assert!(music.join("b/1.flac").exists());
}

#[test]
fn test_outcomes_are_named() {
    let (temp, music) = music_root();
    write_test_zip(&music.join("a.zip"), &[("1.flac", "one")]);

    let report = unpack_tree(temp.path(), &UnpackConfig::default()).unwrap();
    let archive = &report.archives[0];

    assert_eq!(archive.path, music.join("a.zip"));
    assert_eq!(archive.entries_written, 1);
    assert_eq!(archive.bytes_written, 3);
    assert!(EntryOutcome::Skipped.is_fulfilled());
}
