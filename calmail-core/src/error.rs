//! Error types for calmail.
//!
//! Only I/O-level failures surface as errors. Malformed fields, missing
//! matches and suppressed operations are reported as
//! [`Outcome`](crate::reconcile::Outcome) values instead.

use thiserror::Error;

/// Errors that can occur in calmail operations.
#[derive(Error, Debug)]
pub enum CalmailError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Calendar store error: {0}")]
    Store(String),

    #[error("Mailbox error: {0}")]
    Mailbox(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for calmail operations.
pub type CalmailResult<T> = Result<T, CalmailError>;
