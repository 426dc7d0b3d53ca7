//! The CalendarGateway trait definition.

use async_trait::async_trait;

use crate::error::CalendarError;
use crate::event::CalendarEvent;

/// A trait for reading and updating events in a mailbox calendar.
///
/// Implementations open an impersonated session per mailbox against the
/// backing calendar service. This trait is object-safe and can be used with
/// `Box<dyn CalendarGateway>`.
#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Fetch up to `limit` future events from a mailbox's calendar.
    ///
    /// Only events starting strictly after "now" are returned, ordered by
    /// start time descending. The returned events carry their current body.
    async fn upcoming_events(
        &self,
        mailbox: &str,
        limit: usize,
    ) -> Result<Vec<CalendarEvent>, CalendarError>;

    /// Replace an event's body, persist it, and notify all attendees.
    ///
    /// The save must use the service's send-to-all-and-save-copy semantics:
    /// every attendee receives an updated invitation and the organizer keeps
    /// a copy.
    async fn update_body(
        &self,
        mailbox: &str,
        event_id: &str,
        change_key: &str,
        body: &str,
    ) -> Result<(), CalendarError>;

    /// Get a human-readable name for this gateway implementation.
    fn name(&self) -> &str;
}
