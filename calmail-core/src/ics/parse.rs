//! Invitation parsing.
//!
//! This is a line scanner, not a full RFC 5545 parser: it picks up SUMMARY,
//! DESCRIPTION, LOCATION, DTSTART, DTEND and ATTENDEE lines wherever they
//! appear and ignores everything else. A repeated property overwrites the
//! earlier one. It never fails; absent or malformed fields come back empty
//! or `None`.

use chrono::{NaiveDate, NaiveDateTime};

use crate::email::{extract_mailto, is_valid_email};
use crate::event::ParsedEvent;

/// Parse invitation text into a [`ParsedEvent`].
pub fn parse_invite(text: &str) -> ParsedEvent {
    let mut event = ParsedEvent::default();
    let mut raw_start: Option<&str> = None;
    let mut raw_end: Option<&str> = None;
    // Set after a DESCRIPTION line, cleared by any non-continuation line
    let mut in_description = false;

    for line in text.split('\n') {
        if in_description && (line.starts_with(' ') || line.starts_with('\t')) {
            event.description.push(' ');
            event.description.push_str(line.trim());
            continue;
        }
        in_description = false;

        if let Some(value) = line.strip_prefix("SUMMARY:") {
            event.title = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix("DESCRIPTION:") {
            event.description = value.trim().to_string();
            in_description = true;
        } else if let Some(value) = line.strip_prefix("LOCATION:") {
            event.location = value.trim().to_string();
        } else if let Some(token) = date_property_value(line, "DTSTART") {
            raw_start = Some(token);
        } else if let Some(token) = date_property_value(line, "DTEND") {
            raw_end = Some(token);
        } else if line.starts_with("ATTENDEE;") || line.starts_with("ATTENDEE:") {
            match extract_mailto(line) {
                Some(email) if is_valid_email(email) => event.attendees.push(email.to_string()),
                Some(email) => tracing::debug!(email, "Dropping attendee with invalid address"),
                None => tracing::debug!("ATTENDEE line without mailto address"),
            }
        }
    }

    event.description = event.description.replace("\\n", "\n").trim().to_string();
    event.start = raw_start.and_then(to_timestamp);
    event.end = raw_end.and_then(to_timestamp);

    event
}

/// Value of a `NAME;PARAMS:value` or `NAME:value` line, i.e. everything
/// after the first colon.
fn date_property_value<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(name)?;
    if !(rest.starts_with(';') || rest.starts_with(':')) {
        return None;
    }
    line.split_once(':').map(|(_, value)| value.trim())
}

/// Convert a compact `YYYYMMDD` or `YYYYMMDDTHHMM[SS][Z]` token to a local timestamp.
///
/// Seconds and the UTC marker are ignored; the value is read as local time.
/// Empty or malformed tokens are logged and yield `None`.
pub fn to_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        tracing::error!("Empty date-time token");
        return None;
    }

    match parse_compact(raw) {
        Ok(ts) => Some(ts),
        Err(reason) => {
            tracing::error!(token = raw, %reason, "Could not convert date-time token");
            None
        }
    }
}

fn parse_compact(raw: &str) -> Result<NaiveDateTime, String> {
    let field = |from: usize, to: usize, what: &str| -> Result<u32, String> {
        raw.get(from..to)
            .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| format!("invalid {what}"))
    };

    let year = field(0, 4, "year")? as i32;
    let month = field(4, 6, "month")?;
    let day = field(6, 8, "day")?;

    let (hour, minute) = match raw.as_bytes().get(8) {
        None => (0, 0),
        Some(b'T') => (field(9, 11, "hour")?, field(11, 13, "minute")?),
        Some(_) => return Err("expected 'T' after the date".to_string()),
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| "not a valid calendar date".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const MINIMAL: &str = "BEGIN:VCALENDAR\n\
BEGIN:VEVENT\n\
SUMMARY:Standup\n\
DTSTART;TZID=Europe/Madrid:20240115T090000\n\
DTEND;TZID=Europe/Madrid:20240115T093000\n\
END:VEVENT\n\
END:VCALENDAR\n";

    #[test]
    fn test_minimal_invite() {
        let event = parse_invite(MINIMAL);

        assert_eq!(event.title, "Standup");
        assert_eq!(event.description, "");
        assert_eq!(event.location, "");
        assert!(event.attendees.is_empty());

        let start = event.start.expect("start should parse");
        let end = event.end.expect("end should parse");
        assert_eq!((start.hour(), start.minute()), (9, 0));
        assert_eq!((end.hour(), end.minute()), (9, 30));
    }

    #[test]
    fn test_crlf_line_endings() {
        let event = parse_invite(&MINIMAL.replace('\n', "\r\n"));

        assert_eq!(event.title, "Standup");
        assert!(event.start.is_some());
        assert!(event.end.is_some());
    }

    #[test]
    fn test_folded_description() {
        let ics = "BEGIN:VEVENT\n\
DESCRIPTION:Agenda for the\n \
weekly sync\n\tand retro\n\
LOCATION:Room 4\n\
END:VEVENT";

        let event = parse_invite(ics);

        assert_eq!(event.description, "Agenda for the weekly sync and retro");
        assert_eq!(event.location, "Room 4");
    }

    #[test]
    fn test_description_escaped_newlines() {
        let ics = "DESCRIPTION:Line one\\nLine two\n  continued\\n\n";

        let event = parse_invite(ics);

        assert_eq!(event.description, "Line one\nLine two continued");
    }

    #[test]
    fn test_indented_line_outside_description_is_ignored() {
        let ics = "SUMMARY:Planning\n  not part of anything\nDESCRIPTION:Short\nUID:1\n  orphan";

        let event = parse_invite(ics);

        assert_eq!(event.title, "Planning");
        assert_eq!(event.description, "Short");
    }

    #[test]
    fn test_bare_date_properties_are_accepted() {
        let ics = "DTSTART:20240115T093000Z\nDTEND:20240115T100000Z\n";

        let event = parse_invite(ics);

        assert!(event.start.is_some());
        assert!(event.end.is_some());
    }

    #[test]
    fn test_similar_property_names_do_not_match() {
        let ics = "DTSTARTX:20240115T093000\nDTENDING;X=1:20240115T100000\n";

        let event = parse_invite(ics);

        assert_eq!(event.start, None);
        assert_eq!(event.end, None);
    }

    #[test]
    fn test_attendees_filtered_to_valid_addresses() {
        let ics = "ATTENDEE;CN=Alice;RSVP=TRUE:mailto:alice@example.com\n\
ATTENDEE:mailto:broken@localhost\n\
ATTENDEE;CN=Room:urn:uuid:1234\n\
ATTENDEE:mailto:bob@example.org\n";

        let event = parse_invite(ics);

        assert_eq!(event.attendees, vec!["alice@example.com", "bob@example.org"]);
    }

    #[test]
    fn test_missing_fields_degrade() {
        let event = parse_invite("BEGIN:VCALENDAR\nEND:VCALENDAR");

        assert_eq!(event, ParsedEvent::default());
    }

    #[test]
    fn test_to_timestamp_with_utc_marker() {
        let ts = to_timestamp("20240115T093000Z").expect("should convert");

        assert_eq!(ts.year(), 2024);
        assert_eq!(ts.month0(), 0);
        assert_eq!(ts.day(), 15);
        assert_eq!(ts.hour(), 9);
        assert_eq!(ts.minute(), 30);
    }

    #[test]
    fn test_to_timestamp_date_only() {
        let ts = to_timestamp("20240115").expect("should convert");

        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 1, 15));
        assert_eq!((ts.hour(), ts.minute()), (0, 0));
    }

    #[test]
    fn test_to_timestamp_ignores_seconds() {
        let ts = to_timestamp("20240115T093059").expect("should convert");
        assert_eq!(ts.second(), 0);
    }

    #[test_log::test]
    fn test_to_timestamp_empty_is_none() {
        assert_eq!(to_timestamp(""), None);
        assert_eq!(to_timestamp("  "), None);
    }

    #[test_log::test]
    fn test_to_timestamp_malformed_is_none() {
        assert_eq!(to_timestamp("2024011"), None);
        assert_eq!(to_timestamp("20241315T090000"), None);
        assert_eq!(to_timestamp("20240115T09"), None);
        assert_eq!(to_timestamp("2024-01-15"), None);
        assert_eq!(to_timestamp("20240115X0930"), None);
        assert_eq!(to_timestamp("20240115Z"), None);
    }

    #[test]
    fn test_unparsable_dtstart_degrades_to_none() {
        let event = parse_invite("SUMMARY:X\nDTSTART;VALUE=DATE:\nDTEND;VALUE=DATE:20240116\n");

        assert_eq!(event.start, None);
        assert!(event.end.is_some());
    }
}
