//! Mock calendar gateway implementations for testing.
//!
//! This crate provides [`ScriptedCalendar`], an in-memory
//! [`CalendarGateway`] whose events and failures are scripted by the test,
//! and which records every fetch and save it receives.
//!
//! # Example
//!
//! ```rust
//! use calendar_core::{CalendarEvent, CalendarGateway};
//! use chrono::Utc;
//! use mock_calendar::ScriptedCalendar;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), calendar_core::CalendarError> {
//!     let calendar = ScriptedCalendar::new();
//!     calendar.add_event("a@x.com", CalendarEvent::new("ev-1", Utc::now()));
//!
//!     let events = calendar.upcoming_events("a@x.com", 20).await?;
//!     assert_eq!(events.len(), 1);
//!     Ok(())
//! }
//! ```

mod scripted;

// Re-export calendar-core types for convenience
pub use calendar_core::{async_trait, CalendarError, CalendarEvent, CalendarGateway};

pub use scripted::{FailureMode, SaveRecord, ScriptedCalendar};
