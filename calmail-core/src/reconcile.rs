//! Reconciling invitations against a calendar store.
//!
//! Each entry point parses the invitation text, consults the deletion
//! memory, queries the store for the event's time window and then creates,
//! replaces or removes a store event. Anything short of an I/O failure ends
//! in an [`Outcome`], logged, and never an error.

use std::fmt;

use crate::classify::Intent;
use crate::deletion_memory::DeletionMemory;
use crate::email::is_valid_email;
use crate::error::CalmailResult;
use crate::event::{EventOptions, ParsedEvent, StoredEvent, TimeWindow};
use crate::ics::parse_invite;
use crate::store::CalendarStore;

pub const DEFAULT_PROVENANCE_NOTE: &str = "Imported by calmail from a calendar invitation.";

/// How a single reconciliation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Created(StoredEvent),
    /// The matching event was removed and a new one created in its place
    Replaced {
        removed: StoredEvent,
        created: StoredEvent,
    },
    Deleted(StoredEvent),
    /// An event with the same title, start and end already exists
    Duplicate,
    /// The title was canceled earlier in this run
    Suppressed,
    /// No event with this title in the time window
    NoMatch,
    /// Start or end time missing or unparsable
    UnresolvedTimeWindow,
    /// More than one same-titled event on the day a rescheduled event moved to
    Ambiguous,
}

impl Outcome {
    /// Whether the store was changed.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Outcome::Created(_) | Outcome::Replaced { .. } | Outcome::Deleted(_)
        )
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created(e) => write!(f, "created \"{}\" at {}", e.title, e.start),
            Outcome::Replaced { removed, created } => write!(
                f,
                "replaced \"{}\" at {} with {}",
                removed.title, removed.start, created.start
            ),
            Outcome::Deleted(e) => write!(f, "deleted \"{}\" at {}", e.title, e.start),
            Outcome::Duplicate => write!(f, "skipped: duplicate"),
            Outcome::Suppressed => write!(f, "skipped: canceled earlier in this run"),
            Outcome::NoMatch => write!(f, "skipped: no matching event"),
            Outcome::UnresolvedTimeWindow => write!(f, "skipped: missing start or end time"),
            Outcome::Ambiguous => write!(f, "skipped: several events with this title that day"),
        }
    }
}

/// Applies create/update/delete requests to a store.
///
/// The deletion memory is passed in by the caller and lives as long as the
/// reconciler, which is normally one batch run.
pub struct Reconciler<S> {
    store: S,
    memory: DeletionMemory,
    provenance_note: String,
}

impl<S: CalendarStore> Reconciler<S> {
    pub fn new(store: S, memory: DeletionMemory) -> Self {
        Reconciler {
            store,
            memory,
            provenance_note: DEFAULT_PROVENANCE_NOTE.to_string(),
        }
    }

    /// Note appended to the description of every event this reconciler creates.
    pub fn with_provenance_note(mut self, note: impl Into<String>) -> Self {
        self.provenance_note = note.into();
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn memory(&self) -> &DeletionMemory {
        &self.memory
    }

    /// Run the entry point matching `intent`.
    pub fn apply(&mut self, intent: Intent, text: &str) -> CalmailResult<Outcome> {
        match intent {
            Intent::Create => self.create(text),
            Intent::Update => self.update(text),
            Intent::Delete => self.delete(text),
        }
    }

    pub fn create(&mut self, text: &str) -> CalmailResult<Outcome> {
        let event = parse_invite(text);

        if self.memory.contains(&event.title) {
            tracing::warn!(title = %event.title, "Not creating event canceled earlier in this run");
            return Ok(Outcome::Suppressed);
        }

        let Some(window) = event.window() else {
            tracing::warn!(title = %event.title, "Not creating event without start and end time");
            return Ok(Outcome::UnresolvedTimeWindow);
        };

        let existing = self.store.events_in(&window)?;
        if existing.iter().any(|e| e.is_same_slot(&event.title, &window)) {
            tracing::warn!(
                title = %event.title,
                start = %window.start,
                end = %window.end,
                "Event already exists, skipping"
            );
            return Ok(Outcome::Duplicate);
        }

        let created = self.create_from(&event, &window)?;
        tracing::info!(title = %created.title, start = %created.start, end = %created.end, "Created event");
        Ok(Outcome::Created(created))
    }

    /// Replace the first event with the same title in the window.
    ///
    /// When none overlaps the new window, the event is looked up across the
    /// whole day(s) instead, and replaced only if exactly one candidate has
    /// the title.
    pub fn update(&mut self, text: &str) -> CalmailResult<Outcome> {
        let event = parse_invite(text);

        if self.memory.contains(&event.title) {
            tracing::warn!(title = %event.title, "Not updating event canceled earlier in this run");
            return Ok(Outcome::Suppressed);
        }

        let Some(window) = event.window() else {
            tracing::warn!(title = %event.title, "Cannot update event without start and end time");
            return Ok(Outcome::UnresolvedTimeWindow);
        };

        let removed = match self.find_by_title(&window, &event.title)? {
            Some(found) => found,
            None => {
                let mut candidates: Vec<StoredEvent> = self
                    .store
                    .events_in(&window.spanning_days())?
                    .into_iter()
                    .filter(|e| e.title == event.title)
                    .collect();

                match candidates.len() {
                    0 => {
                        tracing::warn!(title = %event.title, start = %window.start, "No event to update");
                        return Ok(Outcome::NoMatch);
                    }
                    1 => candidates.remove(0),
                    n => {
                        tracing::warn!(
                            title = %event.title,
                            start = %window.start,
                            candidates = n,
                            "Several events could be the one rescheduled, not updating"
                        );
                        return Ok(Outcome::Ambiguous);
                    }
                }
            }
        };

        self.store.delete_event(&removed)?;
        let created = self.create_from(&event, &window)?;
        tracing::info!(
            title = %created.title,
            old_start = %removed.start,
            start = %created.start,
            end = %created.end,
            "Replaced event"
        );
        Ok(Outcome::Replaced { removed, created })
    }

    /// Remember the title as canceled, then remove the first matching event.
    pub fn delete(&mut self, text: &str) -> CalmailResult<Outcome> {
        let event = parse_invite(text);
        self.memory.record(&event.title);

        let Some(window) = event.window() else {
            tracing::warn!(title = %event.title, "Cannot locate canceled event without start and end time");
            return Ok(Outcome::UnresolvedTimeWindow);
        };

        let Some(removed) = self.find_by_title(&window, &event.title)? else {
            tracing::warn!(title = %event.title, start = %window.start, "No event to delete");
            return Ok(Outcome::NoMatch);
        };

        self.store.delete_event(&removed)?;
        tracing::info!(title = %removed.title, start = %removed.start, "Deleted event");
        Ok(Outcome::Deleted(removed))
    }

    fn find_by_title(&self, window: &TimeWindow, title: &str) -> CalmailResult<Option<StoredEvent>> {
        Ok(self
            .store
            .events_in(window)?
            .into_iter()
            .find(|e| e.title == title))
    }

    fn create_from(&mut self, event: &ParsedEvent, window: &TimeWindow) -> CalmailResult<StoredEvent> {
        let options = EventOptions {
            description: self.describe(&event.description),
            location: event.location.clone(),
            // Parser already filters, kept so stores never see a bad address
            guests: event
                .attendees
                .iter()
                .filter(|a| is_valid_email(a))
                .cloned()
                .collect(),
            send_invites: false,
        };
        self.store.create_event(&event.title, window, options)
    }

    fn describe(&self, description: &str) -> String {
        match (description.is_empty(), self.provenance_note.is_empty()) {
            (_, true) => description.to_string(),
            (true, false) => self.provenance_note.clone(),
            (false, false) => format!("{}\n\n{}", description, self.provenance_note),
        }
    }
}
