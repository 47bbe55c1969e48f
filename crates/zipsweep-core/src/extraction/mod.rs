//! Concurrent extraction of the entries of one archive.
//!
//! [`EntryExtractor`] decides skip-or-write for every entry synchronously,
//! then launches one blocking task per entry and hands back the in-flight
//! set as [`PendingEntries`] without waiting for any of them.

mod entry;
mod pending;

pub use entry::EntryExtractor;
pub use entry::entry_destination;
pub use entry::remove_stale_sibling;
pub use pending::PendingEntries;
