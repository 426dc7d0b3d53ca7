//! # ews-calendar
//!
//! [`CalendarGateway`](calendar_core::CalendarGateway) implementation
//! speaking Exchange Web Services SOAP over HTTPS.
//!
//! Each call impersonates the target mailbox via an `ExchangeImpersonation`
//! header, so one service account can read and update every monitored
//! calendar. Three operations are used: `FindItem` (future events),
//! `GetItem` (HTML bodies) and `UpdateItem` with send-to-all-and-save-copy
//! semantics.
//!
//! ```no_run
//! use calendar_core::CalendarGateway;
//! use ews_calendar::{EwsClient, EwsConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), calendar_core::CalendarError> {
//!     let config = EwsConfig::new("mail.example.com", "svc-enricher", "secret");
//!     let client = EwsClient::new(config)?;
//!
//!     let events = client.upcoming_events("a@x.com", 20).await?;
//!     println!("{} upcoming events", events.len());
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod parse;
mod soap;

pub use client::EwsClient;
pub use config::EwsConfig;
