use std::path::Path;

use anyhow::{Context, Result};
use calmail_core::classify::Intent;
use calmail_core::config::CalmailConfig;
use calmail_core::deletion_memory::DeletionMemory;
use calmail_core::reconcile::Reconciler;
use calmail_core::store::DirStore;
use owo_colors::OwoColorize;

pub fn run(config: &CalmailConfig, intent: Intent, file: &Path, calendar_dir: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Could not read {}", file.display()))?;
    let store = DirStore::open(calendar_dir)
        .with_context(|| format!("Could not open calendar {}", calendar_dir.display()))?;

    let mut reconciler = Reconciler::new(store, DeletionMemory::new())
        .with_provenance_note(config.provenance_note.as_str());

    let outcome = reconciler.apply(intent, &text)?;

    if outcome.is_mutation() {
        println!("{}", outcome.green());
    } else {
        println!("{}", outcome.dimmed());
    }

    Ok(())
}
