//! ICS file generation for stored events.

use crate::event::StoredEvent;
use icalendar::{Calendar, Component, EventLike, Property};

/// Custom property recording whether guests were meant to be notified.
pub(crate) const SEND_INVITES_PROPERTY: &str = "X-CALMAIL-SEND-INVITES";

/// Stored events are floating local times, written without `Z` or TZID.
pub(crate) const FLOATING_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Generate .ics content for a stored event
pub fn generate_ics(event: &StoredEvent) -> String {
    let mut cal = Calendar::new();

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&event.id);
    ics_event.summary(&event.title);

    let dtstamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string();
    ics_event.add_property("DTSTAMP", &dtstamp);

    ics_event.add_property("DTSTART", event.start.format(FLOATING_FORMAT).to_string());
    ics_event.add_property("DTEND", event.end.format(FLOATING_FORMAT).to_string());

    if !event.description.is_empty() {
        ics_event.description(&event.description);
    }

    if !event.location.is_empty() {
        ics_event.location(&event.location);
    }

    for guest in &event.guests {
        let mut prop = Property::new("ATTENDEE", format!("mailto:{}", guest));
        prop.add_parameter("RSVP", if event.send_invites { "TRUE" } else { "FALSE" });
        ics_event.append_multi_property(prop);
    }

    ics_event.add_property(
        SEND_INVITES_PROPERTY,
        if event.send_invites { "TRUE" } else { "FALSE" },
    );

    let ics_event = ics_event.done();
    cal.push(ics_event);
    let cal = cal.done();

    strip_ics_bloat(&cal.to_string())
}

/// Replace the icalendar crate's PRODID and drop CALSCALE:GREGORIAN (the default)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:-//calmail//EN\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventOptions;
    use chrono::NaiveDate;

    fn make_event() -> StoredEvent {
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        StoredEvent::new(
            "evt-1".to_string(),
            "Standup",
            day.and_hms_opt(9, 0, 0).unwrap(),
            day.and_hms_opt(9, 30, 0).unwrap(),
            EventOptions {
                description: "Daily sync".to_string(),
                location: "Room 4".to_string(),
                guests: vec!["alice@example.com".to_string()],
                send_invites: false,
            },
        )
    }

    #[test]
    fn test_generates_floating_times() {
        let ics = generate_ics(&make_event());

        assert!(ics.contains("DTSTART:20240115T090000\r\n"));
        assert!(ics.contains("DTEND:20240115T093000\r\n"));
        assert!(ics.contains("UID:evt-1\r\n"));
    }

    #[test]
    fn test_strips_bloat() {
        let ics = generate_ics(&make_event());

        assert!(ics.contains("PRODID:-//calmail//EN"));
        assert!(!ics.contains("CALSCALE"));
    }

    #[test]
    fn test_records_invite_flag() {
        let ics = generate_ics(&make_event());

        assert!(ics.contains("X-CALMAIL-SEND-INVITES:FALSE"));
        assert!(ics.contains("mailto:alice@example.com"));
    }
}
