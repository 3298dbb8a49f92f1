//! Event types shared by the parser, the reconciler and the stores.
//!
//! All timestamps are offset-less local times (`NaiveDateTime`). Invitations
//! are read without any time zone adjustment, and the stores keep them that
//! way.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// The fields extracted from one invitation's VEVENT.
///
/// Produced fresh by [`crate::ics::parse_invite`] for each message and never
/// persisted. Missing fields are empty strings, missing or unparsable times
/// are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    /// Addresses from ATTENDEE lines, already filtered to valid syntax
    pub attendees: Vec<String>,
}

impl ParsedEvent {
    /// The event's time window, if both ends resolved.
    pub fn window(&self) -> Option<TimeWindow> {
        Some(TimeWindow::new(self.start?, self.end?))
    }
}

/// A closed `[start, end]` range used to query a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        TimeWindow { start, end }
    }

    /// Whether an event spanning `start..end` falls in this window.
    ///
    /// Events overlapping the window count, as do zero-length events that
    /// begin exactly at the window start.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        (start < self.end && end > self.start) || start == self.start
    }

    /// Midnight of the start day to midnight after the end day.
    pub fn spanning_days(&self) -> TimeWindow {
        TimeWindow {
            start: self.start.date().and_time(NaiveTime::MIN),
            end: self.end.date().and_time(NaiveTime::MIN) + Duration::days(1),
        }
    }
}

/// Optional fields passed to [`crate::store::CalendarStore::create_event`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventOptions {
    pub description: String,
    pub location: String,
    pub guests: Vec<String>,
    /// Whether the store should notify guests. calmail always sends `false`.
    pub send_invites: bool,
}

impl EventOptions {
    /// Guests as the comma-joined list calendar backends expect.
    pub fn guests_joined(&self) -> String {
        self.guests.join(",")
    }
}

/// An event as held by a calendar store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Store-assigned identifier
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub description: String,
    pub location: String,
    pub guests: Vec<String>,
    pub send_invites: bool,
}

impl StoredEvent {
    pub fn new(
        id: String,
        title: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        options: EventOptions,
    ) -> Self {
        StoredEvent {
            id,
            title: title.to_string(),
            start,
            end,
            description: options.description,
            location: options.location,
            guests: options.guests,
            send_invites: options.send_invites,
        }
    }

    /// Exact title/start/end match, used for duplicate detection.
    pub fn is_same_slot(&self, title: &str, window: &TimeWindow) -> bool {
        self.title == title && self.start == window.start && self.end == window.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn window_requires_both_ends() {
        let mut event = ParsedEvent {
            start: Some(at(9, 0)),
            ..Default::default()
        };
        assert!(event.window().is_none());

        event.end = Some(at(9, 30));
        assert_eq!(event.window(), Some(TimeWindow::new(at(9, 0), at(9, 30))));
    }

    #[test]
    fn overlap_excludes_touching_events() {
        let window = TimeWindow::new(at(9, 0), at(10, 0));

        assert!(window.overlaps(at(8, 30), at(9, 15)));
        assert!(window.overlaps(at(9, 30), at(11, 0)));
        assert!(!window.overlaps(at(10, 0), at(11, 0)));
        assert!(!window.overlaps(at(8, 0), at(9, 0)));
    }

    #[test]
    fn overlap_includes_zero_length_event_at_start() {
        let window = TimeWindow::new(at(9, 0), at(9, 0));
        assert!(window.overlaps(at(9, 0), at(9, 0)));
        assert!(!window.overlaps(at(9, 1), at(9, 1)));
    }

    #[test]
    fn spanning_days_covers_whole_days() {
        let window = TimeWindow::new(at(10, 0), at(10, 30)).spanning_days();

        assert!(window.overlaps(at(0, 0), at(0, 30)));
        assert!(window.overlaps(at(23, 0), at(23, 59)));
        assert_eq!(window.end - window.start, Duration::days(1));
    }

    #[test]
    fn guests_are_comma_joined() {
        let options = EventOptions {
            guests: vec!["a@example.com".into(), "b@example.com".into()],
            ..Default::default()
        };
        assert_eq!(options.guests_joined(), "a@example.com,b@example.com");
    }
}
