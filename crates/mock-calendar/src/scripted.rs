//! Scripted in-memory calendar gateway.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use calendar_core::{CalendarError, CalendarEvent, CalendarGateway};

/// How a scripted mailbox should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// The service reports no mailbox for the address (permanent).
    NoMailbox,
    /// A transient transport failure.
    Transient,
}

/// One recorded `update_body` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRecord {
    pub mailbox: String,
    pub event_id: String,
    pub change_key: String,
    pub body: String,
}

#[derive(Debug, Default)]
struct Inner {
    events: HashMap<String, Vec<CalendarEvent>>,
    mailbox_failures: HashMap<String, FailureMode>,
    save_failures: HashMap<String, FailureMode>,
    fetches: Vec<String>,
    saves: Vec<SaveRecord>,
}

/// An in-memory calendar whose contents and failures are scripted.
///
/// Clones share state, so a test can keep a handle for assertions while the
/// worker owns another.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCalendar {
    inner: Arc<Mutex<Inner>>,
}

impl ScriptedCalendar {
    /// Create an empty calendar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event to a mailbox's calendar.
    pub fn add_event(&self, mailbox: impl Into<String>, event: CalendarEvent) {
        let mut inner = self.inner.lock().unwrap();
        inner.events.entry(mailbox.into()).or_default().push(event);
    }

    /// Script a failure for every fetch of the given mailbox.
    pub fn fail_mailbox(&self, mailbox: impl Into<String>, mode: FailureMode) {
        let mut inner = self.inner.lock().unwrap();
        inner.mailbox_failures.insert(mailbox.into(), mode);
    }

    /// Script a failure for every save of the given event.
    pub fn fail_save(&self, event_id: impl Into<String>, mode: FailureMode) {
        let mut inner = self.inner.lock().unwrap();
        inner.save_failures.insert(event_id.into(), mode);
    }

    /// All mailboxes fetched so far, in order.
    pub fn fetches(&self) -> Vec<String> {
        self.inner.lock().unwrap().fetches.clone()
    }

    /// All `update_body` calls received so far, in order.
    pub fn saves(&self) -> Vec<SaveRecord> {
        self.inner.lock().unwrap().saves.clone()
    }

    fn failure_error(mode: FailureMode, mailbox: &str) -> CalendarError {
        match mode {
            FailureMode::NoMailbox => CalendarError::NoMailbox {
                mailbox: mailbox.to_string(),
            },
            FailureMode::Transient => CalendarError::Transport("scripted failure".to_string()),
        }
    }
}

#[async_trait]
impl CalendarGateway for ScriptedCalendar {
    async fn upcoming_events(
        &self,
        mailbox: &str,
        limit: usize,
    ) -> Result<Vec<CalendarEvent>, CalendarError> {
        let mut inner = self.inner.lock().unwrap();
        inner.fetches.push(mailbox.to_string());

        if let Some(mode) = inner.mailbox_failures.get(mailbox) {
            return Err(Self::failure_error(*mode, mailbox));
        }

        let mut events = inner.events.get(mailbox).cloned().unwrap_or_default();
        events.truncate(limit);
        Ok(events)
    }

    async fn update_body(
        &self,
        mailbox: &str,
        event_id: &str,
        change_key: &str,
        body: &str,
    ) -> Result<(), CalendarError> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(mode) = inner.save_failures.get(event_id) {
            return Err(Self::failure_error(*mode, mailbox));
        }

        inner.saves.push(SaveRecord {
            mailbox: mailbox.to_string(),
            event_id: event_id.to_string(),
            change_key: change_key.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }

    fn name(&self) -> &str {
        "ScriptedCalendar"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_scripted_events_and_limit() {
        let calendar = ScriptedCalendar::new();
        for i in 0..5 {
            calendar.add_event("a@x.com", CalendarEvent::new(format!("ev-{i}"), Utc::now()));
        }

        let events = calendar.upcoming_events("a@x.com", 3).await.unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(calendar.fetches(), vec!["a@x.com".to_string()]);
    }

    #[tokio::test]
    async fn test_scripted_no_mailbox() {
        let calendar = ScriptedCalendar::new();
        calendar.fail_mailbox("ghost@x.com", FailureMode::NoMailbox);

        let err = calendar.upcoming_events("ghost@x.com", 20).await.unwrap_err();
        assert!(err.is_permanent());
    }

    #[tokio::test]
    async fn test_saves_are_recorded() {
        let calendar = ScriptedCalendar::new();
        calendar
            .update_body("a@x.com", "ev-1", "ck", "<p>hi</p>")
            .await
            .unwrap();

        let saves = calendar.saves();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].event_id, "ev-1");
        assert_eq!(saves[0].body, "<p>hi</p>");
    }

    #[tokio::test]
    async fn test_scripted_save_failure() {
        let calendar = ScriptedCalendar::new();
        calendar.fail_save("ev-1", FailureMode::Transient);

        let err = calendar
            .update_body("a@x.com", "ev-1", "ck", "<p>hi</p>")
            .await
            .unwrap_err();
        assert!(!err.is_permanent());
        assert!(calendar.saves().is_empty());
    }
}
