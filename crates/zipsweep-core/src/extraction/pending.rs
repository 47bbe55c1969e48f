//! In-flight entry extractions for one archive.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use tokio::task::JoinSet;

use crate::ExtractionError;
use crate::report::EntryOutcome;
use crate::report::SettledEntry;

/// The set of entry extractions launched for one archive.
///
/// Each entry runs on its own blocking task. Settling drains every task
/// without short-circuiting: a failed or panicking entry never prevents its
/// siblings from being collected.
///
/// Tasks do run in parallel on the blocking pool. Ordering still holds
/// because every skip decision is taken on the launching task before any
/// entry task is spawned, and each task touches only its own destination
/// file and stale sibling.
#[derive(Default)]
pub struct PendingEntries {
    tasks: JoinSet<SettledEntry>,
    launched: usize,
}

impl PendingEntries {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Launches `job` for the entry `name` on the blocking pool.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<F>(&mut self, name: String, job: F)
    where
        F: FnOnce() -> EntryOutcome + Send + 'static,
    {
        self.launched += 1;
        self.tasks.spawn_blocking(move || {
            let outcome = match std::panic::catch_unwind(AssertUnwindSafe(job)) {
                Ok(outcome) => outcome,
                Err(payload) => {
                    let reason = panic_message(payload.as_ref());
                    tracing::error!(entry = %name, %reason, "entry task panicked");
                    EntryOutcome::Failed(ExtractionError::TaskAborted {
                        entry: name.clone(),
                        reason,
                    })
                }
            };
            SettledEntry { name, outcome }
        });
    }

    /// Number of entries launched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.launched
    }

    /// Returns `true` if no entry was launched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.launched == 0
    }

    /// Waits for the next entry to settle, in completion order.
    ///
    /// Returns `None` once every entry has been collected.
    pub async fn next_settled(&mut self) -> Option<SettledEntry> {
        match self.tasks.join_next().await? {
            Ok(settled) => Some(settled),
            Err(join) => {
                // panics are caught inside the task, so only cancellation lands here
                tracing::error!(error = %join, "entry task did not complete");
                Some(SettledEntry {
                    name: String::from("<unknown>"),
                    outcome: EntryOutcome::Failed(ExtractionError::TaskAborted {
                        entry: String::from("<unknown>"),
                        reason: join.to_string(),
                    }),
                })
            }
        }
    }

    /// Waits for every entry and returns all outcomes.
    pub async fn settle_all(mut self) -> Vec<SettledEntry> {
        let mut settled = Vec::with_capacity(self.launched);
        while let Some(entry) = self.next_settled().await {
            settled.push(entry);
        }
        settled
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "panic".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_settle_all_collects_every_outcome() {
        let mut pending = PendingEntries::new();
        pending.spawn("a".to_string(), || EntryOutcome::Written { bytes: 1 });
        pending.spawn("b".to_string(), || {
            EntryOutcome::Failed(ExtractionError::InvalidArchive("crc".to_string()))
        });
        pending.spawn("c".to_string(), || EntryOutcome::Skipped);
        assert_eq!(pending.len(), 3);

        let mut settled = pending.settle_all().await;
        settled.sort_by(|x, y| x.name.cmp(&y.name));

        assert_eq!(settled.len(), 3);
        assert!(settled[0].outcome.is_fulfilled());
        assert!(!settled[1].outcome.is_fulfilled());
        assert!(settled[2].outcome.is_fulfilled());
    }

    #[tokio::test]
    async fn test_panic_becomes_named_failure() {
        let mut pending = PendingEntries::new();
        pending.spawn("boom.flac".to_string(), || panic!("decoder exploded"));
        pending.spawn("fine.flac".to_string(), || EntryOutcome::Skipped);

        let settled = pending.settle_all().await;
        let boom = settled.iter().find(|s| s.name == "boom.flac").unwrap();

        match &boom.outcome {
            EntryOutcome::Failed(ExtractionError::TaskAborted { entry, reason }) => {
                assert_eq!(entry, "boom.flac");
                assert!(reason.contains("decoder exploded"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(settled.iter().any(|s| s.name == "fine.flac"));
    }

    #[tokio::test]
    async fn test_empty_set_settles_immediately() {
        let pending = PendingEntries::new();
        assert!(pending.is_empty());
        assert!(pending.settle_all().await.is_empty());
    }
}
