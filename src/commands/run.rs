use std::path::Path;

use anyhow::{Context, Result};
use calmail_core::batch::process_mailbox;
use calmail_core::config::CalmailConfig;
use calmail_core::deletion_memory::DeletionMemory;
use calmail_core::mailbox::MaildirMailbox;
use calmail_core::reconcile::Reconciler;
use calmail_core::store::DirStore;
use owo_colors::OwoColorize;

pub fn run(config: &CalmailConfig, mailbox_dir: &Path, calendar_dir: &Path) -> Result<()> {
    let mut mailbox = MaildirMailbox::open(mailbox_dir)
        .with_context(|| format!("Could not open mailbox {}", mailbox_dir.display()))?;
    let store = DirStore::open(calendar_dir)
        .with_context(|| format!("Could not open calendar {}", calendar_dir.display()))?;

    let mut reconciler = Reconciler::new(store, DeletionMemory::new())
        .with_provenance_note(config.provenance_note.as_str());

    let stats = process_mailbox(&mut mailbox, &config.classifier(), &mut reconciler)?;

    if stats.threads == 0 {
        println!("{}", "No new threads".dimmed());
        return Ok(());
    }

    println!(
        "{} threads, {} messages ({} not calendar mail)",
        stats.threads, stats.messages, stats.unclassified
    );
    println!(
        "  {} created  {} updated  {} deleted  {} skipped",
        stats.created.green(),
        stats.updated.yellow(),
        stats.deleted.red(),
        stats.skipped.dimmed()
    );
    if stats.failed > 0 {
        println!("  {} failed, see log for details", stats.failed.red().bold());
    }

    Ok(())
}
