use std::path::Path;

use anyhow::{Context, Result};
use calmail_core::ics::parse_invite;
use owo_colors::OwoColorize;

pub fn run(file: &Path, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Could not read {}", file.display()))?;
    let event = parse_invite(&text);

    if json {
        println!("{}", serde_json::to_string_pretty(&event)?);
        return Ok(());
    }

    let time = |t: Option<chrono::NaiveDateTime>| match t {
        Some(t) => t.format("%Y-%m-%d %H:%M").to_string(),
        None => "(unresolved)".dimmed().to_string(),
    };

    println!("{}", event.title.bold());
    println!("  Start:     {}", time(event.start));
    println!("  End:       {}", time(event.end));
    if !event.location.is_empty() {
        println!("  Location:  {}", event.location);
    }
    if !event.attendees.is_empty() {
        println!("  Attendees: {}", event.attendees.join(", "));
    }
    if !event.description.is_empty() {
        println!();
        println!("{}", event.description);
    }

    Ok(())
}
