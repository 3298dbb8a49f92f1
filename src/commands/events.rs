use std::path::Path;

use anyhow::{Context, Result};
use calmail_core::TimeWindow;
use calmail_core::store::{CalendarStore, DirStore};
use chrono::{Duration, NaiveDate, NaiveTime};
use owo_colors::OwoColorize;

const DEFAULT_DAYS: i64 = 7;

pub fn run(calendar_dir: &Path, from: Option<&str>, to: Option<&str>) -> Result<()> {
    let from = match from {
        Some(s) => parse_date(s)?,
        None => chrono::Local::now().date_naive(),
    };
    let to = match to {
        Some(s) => parse_date(s)?,
        None => from + Duration::days(DEFAULT_DAYS),
    };
    if to < from {
        anyhow::bail!("--to ({}) is before --from ({})", to, from);
    }

    let store = DirStore::open(calendar_dir)
        .with_context(|| format!("Could not open calendar {}", calendar_dir.display()))?;
    let window = TimeWindow::new(from.and_time(NaiveTime::MIN), to.and_time(NaiveTime::MIN))
        .spanning_days();
    let events = store.events_in(&window)?;

    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    let mut current_date: Option<NaiveDate> = None;

    for event in &events {
        let date = event.start.date();
        if current_date != Some(date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", date.format("%a %b %-d").bold());
            current_date = Some(date);
        }

        let time = format!(
            "{}-{}",
            event.start.format("%H:%M"),
            event.end.format("%H:%M")
        );
        if event.location.is_empty() {
            println!("  {} {}", time, event.title);
        } else {
            println!("  {} {} {}", time, event.title, format!("@ {}", event.location).dimmed());
        }
    }

    Ok(())
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}
