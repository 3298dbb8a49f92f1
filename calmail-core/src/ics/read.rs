//! Reading stored event files back, using the icalendar crate's parser.

use chrono::NaiveDateTime;
use icalendar::parser::{read_calendar, unfold};

use crate::event::StoredEvent;
use crate::ics::generate::{FLOATING_FORMAT, SEND_INVITES_PROPERTY};

/// Parse a file written by [`crate::ics::generate_ics`].
///
/// Returns `None` when the content has no VEVENT, no UID, or no readable
/// DTSTART/DTEND.
pub fn read_stored_event(content: &str) -> Option<StoredEvent> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).ok()?;
    let vevent = calendar.components.iter().find(|c| c.name == "VEVENT")?;

    let id = vevent.find_prop("UID")?.val.to_string();
    let start = parse_floating(vevent.find_prop("DTSTART")?.val.as_ref())?;
    let end = parse_floating(vevent.find_prop("DTEND")?.val.as_ref())?;

    let text = |name: &str| {
        vevent
            .find_prop(name)
            .map(|p| unescape_ics_value(p.val.as_ref()))
            .unwrap_or_default()
    };

    let guests = vevent
        .properties
        .iter()
        .filter(|p| p.name == "ATTENDEE")
        .map(|p| {
            let val = p.val.as_ref();
            val.strip_prefix("mailto:").unwrap_or(val).to_string()
        })
        .collect();

    let send_invites = vevent
        .find_prop(SEND_INVITES_PROPERTY)
        .is_some_and(|p| p.val.as_ref() == "TRUE");

    Some(StoredEvent {
        id,
        title: text("SUMMARY"),
        start,
        end,
        description: text("DESCRIPTION"),
        location: text("LOCATION"),
        guests,
        send_invites,
    })
}

fn parse_floating(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim_end_matches('Z'), FLOATING_FORMAT).ok()
}

/// Reverses RFC 5545 text escaping: `\,` `\;` `\\` and `\n`
fn unescape_ics_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some(',') | Some(';') | Some('\\') => {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
            Some('n') | Some('N') => {
                result.push('\n');
                chars.next();
            }
            _ => result.push(c),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventOptions;
    use crate::ics::generate_ics;
    use chrono::NaiveDate;

    #[test]
    fn test_reads_generated_event() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let event = StoredEvent::new(
            "evt-1".to_string(),
            "Planning, Q1; draft",
            day.and_hms_opt(10, 0, 0).unwrap(),
            day.and_hms_opt(11, 0, 0).unwrap(),
            EventOptions {
                description: "First line\nSecond line".to_string(),
                location: String::new(),
                guests: vec!["a@example.com".to_string(), "b@example.com".to_string()],
                send_invites: false,
            },
        );

        let ics = generate_ics(&event);
        let read = read_stored_event(&ics).expect("Should read generated ICS");

        assert_eq!(read, event);
    }

    #[test]
    fn test_missing_uid_is_rejected() {
        let ics = "BEGIN:VCALENDAR\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:No uid\r\n\
DTSTART:20240115T100000\r\n\
DTEND:20240115T110000\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

        assert!(read_stored_event(ics).is_none());
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape_ics_value(r"a\, b\; c\\d\ne"), "a, b; c\\d\ne");
        assert_eq!(unescape_ics_value(r"trailing\"), "trailing\\");
    }
}
