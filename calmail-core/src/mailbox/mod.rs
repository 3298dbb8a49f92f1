//! Mail sources.
//!
//! calmail only needs three things from a mailbox: the threads not yet
//! marked processed, each message's subject and attachments, and a way to
//! mark a thread processed once it has been handled.

mod maildir;

pub use maildir::MaildirMailbox;

use crate::error::CalmailResult;

/// Content types treated as calendar invitations.
const CALENDAR_CONTENT_TYPES: &[&str] = &["text/calendar", "application/ics"];

#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub content_type: String,
    pub data: String,
}

impl Attachment {
    /// Whether this is an iCalendar payload. Parameters such as
    /// `; method=REQUEST` are ignored.
    pub fn is_calendar(&self) -> bool {
        let mime = self
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        CALENDAR_CONTENT_TYPES.contains(&mime.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MailMessage {
    pub subject: String,
    pub attachments: Vec<Attachment>,
}

impl MailMessage {
    pub fn calendar_attachments(&self) -> impl Iterator<Item = &Attachment> {
        self.attachments.iter().filter(|a| a.is_calendar())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MailThread {
    pub id: String,
    pub messages: Vec<MailMessage>,
}

pub trait Mailbox {
    /// Threads not yet marked processed, oldest first.
    fn unprocessed_threads(&self) -> CalmailResult<Vec<MailThread>>;

    /// Mark a thread processed so later runs skip it. Marking twice is harmless.
    fn mark_processed(&mut self, thread: &MailThread) -> CalmailResult<()>;
}
