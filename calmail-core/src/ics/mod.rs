//! ICS text handling.
//!
//! `parse` reads incoming invitations. `generate` and `read` serialize the
//! events kept by [`crate::store::DirStore`], one VEVENT per file.

mod generate;
mod parse;
mod read;

pub use generate::generate_ics;
pub use parse::{parse_invite, to_timestamp};
pub use read::read_stored_event;
