//! Core trait and types for calendar gateway implementations.
//!
//! This crate provides the shared interface between the enrichment pipeline
//! and whatever service actually stores the calendars. It defines:
//!
//! - [`CalendarGateway`] - The trait a calendar backend must implement
//! - [`CalendarEvent`] - The event attributes the pipeline consumes
//! - [`CalendarError`] - Error types, including the permanent
//!   no-mailbox classification
//!
//! # Example
//!
//! ```rust
//! use calendar_core::{async_trait, CalendarError, CalendarEvent, CalendarGateway};
//!
//! struct EmptyCalendar;
//!
//! #[async_trait]
//! impl CalendarGateway for EmptyCalendar {
//!     async fn upcoming_events(
//!         &self,
//!         _mailbox: &str,
//!         _limit: usize,
//!     ) -> Result<Vec<CalendarEvent>, CalendarError> {
//!         Ok(Vec::new())
//!     }
//!
//!     async fn update_body(
//!         &self,
//!         _mailbox: &str,
//!         _event_id: &str,
//!         _change_key: &str,
//!         _body: &str,
//!     ) -> Result<(), CalendarError> {
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "EmptyCalendar"
//!     }
//! }
//! ```

mod error;
mod event;
mod trait_def;

pub use error::CalendarError;
pub use event::CalendarEvent;
pub use trait_def::CalendarGateway;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
