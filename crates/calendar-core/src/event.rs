//! Calendar event attributes consumed by the enrichment pipeline.

use chrono::{DateTime, Utc};

/// A calendar event as seen by the enrichment pipeline.
///
/// Only the attributes the pipeline actually reads are carried here. The
/// event is owned by the remote calendar service; the pipeline reads these
/// fields and, on a match, rewrites `body` through
/// [`CalendarGateway::update_body`](crate::CalendarGateway::update_body).
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    /// Unique item identifier assigned by the calendar service.
    pub id: String,
    /// Concurrency token required by the service for item updates.
    pub change_key: String,
    /// When the item was created. Absent on some synthetic items.
    pub created: Option<DateTime<Utc>>,
    /// Scheduled start of the meeting.
    pub start: DateTime<Utc>,
    /// Meeting subject, for logging only.
    pub subject: String,
    /// Free-text location field.
    pub location: Option<String>,
    /// Email address of the meeting organizer.
    pub organizer_email: Option<String>,
    /// Current rich-text (HTML) body. May be empty.
    pub body: String,
}

impl CalendarEvent {
    /// Create an event with the required fields; optional fields unset.
    pub fn new(id: impl Into<String>, start: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            change_key: String::new(),
            created: None,
            start,
            subject: String::new(),
            location: None,
            organizer_email: None,
            body: String::new(),
        }
    }

    /// Builder method to set the change key.
    pub fn with_change_key(mut self, change_key: impl Into<String>) -> Self {
        self.change_key = change_key.into();
        self
    }

    /// Builder method to set the creation timestamp.
    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    /// Builder method to set the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Builder method to set the location text.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set the organizer address.
    pub fn with_organizer(mut self, organizer: impl Into<String>) -> Self {
        self.organizer_email = Some(organizer.into());
        self
    }

    /// Builder method to set the body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}
