//! The mailbox sweep: classify every unprocessed message and hand its
//! calendar attachments to the reconciler.

use serde::Serialize;

use crate::classify::Classifier;
use crate::error::CalmailResult;
use crate::mailbox::Mailbox;
use crate::reconcile::{Outcome, Reconciler};
use crate::store::CalendarStore;

/// Counters for one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub threads: usize,
    pub messages: usize,
    /// Messages whose subject matched no intent
    pub unclassified: usize,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    /// Attachments that ended without changing the store
    pub skipped: usize,
    /// Attachments whose store operation failed
    pub failed: usize,
    pub threads_marked: usize,
}

impl RunStats {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Created(_) => self.created += 1,
            Outcome::Replaced { .. } => self.updated += 1,
            Outcome::Deleted(_) => self.deleted += 1,
            Outcome::Duplicate
            | Outcome::Suppressed
            | Outcome::NoMatch
            | Outcome::UnresolvedTimeWindow
            | Outcome::Ambiguous => self.skipped += 1,
        }
    }
}

/// Process every unprocessed thread once, in mailbox order.
///
/// Messages are handled strictly in sequence so a cancellation earlier in
/// the sweep suppresses later invitations for the same title. Only a
/// failure to list the mailbox aborts the sweep.
pub fn process_mailbox<M, C, S>(
    mailbox: &mut M,
    classifier: &C,
    reconciler: &mut Reconciler<S>,
) -> CalmailResult<RunStats>
where
    M: Mailbox,
    C: Classifier,
    S: CalendarStore,
{
    let threads = mailbox.unprocessed_threads()?;
    let mut stats = RunStats::default();

    tracing::info!(threads = threads.len(), "Processing mailbox");

    for thread in &threads {
        stats.threads += 1;

        for message in &thread.messages {
            stats.messages += 1;

            let Some(intent) = classifier.classify(&message.subject) else {
                tracing::debug!(subject = %message.subject, "Not a calendar message");
                stats.unclassified += 1;
                continue;
            };

            for attachment in message.calendar_attachments() {
                match reconciler.apply(intent, &attachment.data) {
                    Ok(outcome) => {
                        tracing::debug!(thread = %thread.id, %intent, %outcome, "Handled attachment");
                        stats.record(&outcome);
                    }
                    Err(e) => {
                        tracing::error!(thread = %thread.id, %intent, error = %e, "Calendar operation failed");
                        stats.failed += 1;
                    }
                }
            }
        }

        match mailbox.mark_processed(thread) {
            Ok(()) => stats.threads_marked += 1,
            Err(e) => {
                tracing::error!(thread = %thread.id, error = %e, "Could not mark thread processed")
            }
        }
    }

    tracing::info!(
        created = stats.created,
        updated = stats.updated,
        deleted = stats.deleted,
        skipped = stats.skipped,
        failed = stats.failed,
        "Mailbox processed"
    );

    Ok(stats)
}
