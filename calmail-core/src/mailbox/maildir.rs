//! A mailbox on disk: one directory per thread, one `.eml` file per message.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use mail_parser::{MessageParser, MimeHeaders};

use crate::error::{CalmailError, CalmailResult};
use crate::mailbox::{Attachment, MailMessage, MailThread, Mailbox};

const STATE_DIR: &str = ".calmail";
const PROCESSED_FILE: &str = "processed";

/// Layout:
///
/// ```text
/// <root>/
///   <thread-id>/
///     0001.eml
///     0002.eml
///   .calmail/processed
/// ```
///
/// Threads are listed in directory-name order and messages in file-name
/// order. Hidden directories are not threads.
#[derive(Debug, Clone)]
pub struct MaildirMailbox {
    root: PathBuf,
}

impl MaildirMailbox {
    pub fn open(root: impl Into<PathBuf>) -> CalmailResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(CalmailError::Mailbox(format!(
                "Mailbox directory not found: {}",
                root.display()
            )));
        }
        Ok(MaildirMailbox { root })
    }

    fn processed_path(&self) -> PathBuf {
        self.root.join(STATE_DIR).join(PROCESSED_FILE)
    }

    /// Ids of threads already marked processed.
    ///
    /// A missing state file means nothing was processed yet. Any other read
    /// failure is an error, so a damaged state file never causes a rerun.
    pub fn processed_ids(&self) -> CalmailResult<BTreeSet<String>> {
        let path = self.processed_path();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(e) => {
                return Err(CalmailError::Mailbox(format!(
                    "Could not read processed list {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    fn save_processed(&self, ids: &BTreeSet<String>) -> CalmailResult<()> {
        let state_dir = self.root.join(STATE_DIR);
        std::fs::create_dir_all(&state_dir)?;

        let path = state_dir.join(PROCESSED_FILE);
        let temp = state_dir.join(format!("{}.tmp", PROCESSED_FILE));

        let mut content = ids.iter().map(String::as_str).collect::<Vec<_>>().join("\n");
        content.push('\n');

        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }

    fn thread_dirs(&self) -> CalmailResult<Vec<(String, PathBuf)>> {
        let mut dirs: Vec<(String, PathBuf)> = std::fs::read_dir(&self.root)
            .map_err(|e| {
                CalmailError::Mailbox(format!("Could not read {}: {}", self.root.display(), e))
            })?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .filter_map(|path| {
                let name = path.file_name()?.to_str()?.to_string();
                (!name.starts_with('.')).then_some((name, path))
            })
            .collect();

        dirs.sort();
        Ok(dirs)
    }

    fn read_thread(id: String, dir: &Path) -> CalmailResult<MailThread> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|e| e == "eml"))
            .collect();
        files.sort();

        let messages = files
            .iter()
            .filter_map(|path| {
                let raw = match std::fs::read(path) {
                    Ok(raw) => raw,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable message");
                        return None;
                    }
                };
                let message = parse_message(&raw);
                if message.is_none() {
                    tracing::warn!(path = %path.display(), "Skipping unparsable message");
                }
                message
            })
            .collect();

        Ok(MailThread { id, messages })
    }
}

impl Mailbox for MaildirMailbox {
    fn unprocessed_threads(&self) -> CalmailResult<Vec<MailThread>> {
        let processed = self.processed_ids()?;

        self.thread_dirs()?
            .into_iter()
            .filter(|(id, _)| !processed.contains(id))
            .map(|(id, dir)| Self::read_thread(id, &dir))
            .collect()
    }

    fn mark_processed(&mut self, thread: &MailThread) -> CalmailResult<()> {
        let mut ids = self.processed_ids()?;
        if ids.insert(thread.id.clone()) {
            self.save_processed(&ids)?;
            tracing::debug!(thread = %thread.id, "Marked thread processed");
        }
        Ok(())
    }
}

/// Parse a raw RFC 5322 message into its subject and leaf MIME parts.
///
/// Only parts that are either calendar data or named attachments are kept.
/// Returns `None` if the bytes are not a message at all.
pub fn parse_message(raw: &[u8]) -> Option<MailMessage> {
    let parsed = MessageParser::default().parse(raw)?;
    let subject = parsed.subject().unwrap_or_default().to_string();

    let attachments = parsed
        .parts
        .iter()
        .filter_map(|part| {
            let ct = MimeHeaders::content_type(part)?;
            if ct.ctype().eq_ignore_ascii_case("multipart") {
                return None;
            }
            let content_type = match ct.subtype() {
                Some(sub) => format!("{}/{}", ct.ctype(), sub),
                None => ct.ctype().to_string(),
            };

            let attachment = Attachment {
                content_type,
                data: String::from_utf8_lossy(part.contents()).into_owned(),
            };
            let named = MimeHeaders::attachment_name(part).is_some();
            (attachment.is_calendar() || named).then_some(attachment)
        })
        .collect();

    Some(MailMessage {
        subject,
        attachments,
    })
}
