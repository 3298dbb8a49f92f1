//! Core library for calmail.
//!
//! Turns calendar invitation emails into operations on a calendar store:
//! - `ics::parse` reads the VEVENT out of an invitation attachment
//! - `reconcile` decides whether to create, replace or remove a store event
//! - `batch` walks a mailbox and feeds classified messages to the reconciler
//!
//! The calendar store and the mailbox are traits; `store::DirStore` and
//! `mailbox::MaildirMailbox` are the filesystem-backed implementations.

pub mod batch;
pub mod classify;
pub mod config;
pub mod deletion_memory;
pub mod email;
pub mod error;
pub mod event;
pub mod ics;
pub mod mailbox;
pub mod reconcile;
pub mod store;

pub use error::{CalmailError, CalmailResult};
pub use event::{EventOptions, ParsedEvent, StoredEvent, TimeWindow};
