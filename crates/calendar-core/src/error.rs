//! Error types for calendar gateways.

use thiserror::Error;

/// Errors that can occur when talking to a calendar service.
#[derive(Debug, Error)]
pub enum CalendarError {
    /// The service reports that no mailbox exists for the address.
    ///
    /// This is a permanent condition for the lifetime of the process:
    /// callers memoize it and stop polling the mailbox.
    #[error("no mailbox associated with {mailbox}")]
    NoMailbox { mailbox: String },

    /// Network-level failure reaching the service.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success HTTP status.
    #[error("calendar service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The service answered with a SOAP-level error response.
    #[error("calendar service error {code}: {message}")]
    Service { code: String, message: String },

    /// The response could not be parsed.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl CalendarError {
    /// Whether this error should permanently exclude the mailbox from
    /// further polling in this process run.
    pub fn is_permanent(&self) -> bool {
        matches!(self, CalendarError::NoMailbox { .. })
    }
}
