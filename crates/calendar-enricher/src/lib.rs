//! # calendar-enricher
//!
//! The calendar-matching and enrichment pipeline: a poll loop that watches a
//! roster of mailbox calendars for upcoming meetings carrying a marker word
//! in their location, resolves conferencing join details for the organizer's
//! personal room, renders them into the meeting body and asks the calendar
//! gateway to save and re-notify.
//!
//! The worker is generic over [`CalendarGateway`](calendar_core::CalendarGateway)
//! and [`RoomResolver`], so tests run it against scripted implementations.
//!
//! ```ignore
//! use calendar_enricher::{EnrichmentWorker, MatchMemory, RosterStore, WorkerConfig};
//!
//! # async fn example(gateway: ews_calendar::EwsClient, resolver: cms_client::CmsClient) {
//! let config = WorkerConfig::new("VKS", "config/invitation.html");
//! let store = RosterStore::new("config/users.txt");
//! let worker = EnrichmentWorker::new(gateway, resolver, config, store, MatchMemory::new());
//!
//! worker
//!     .run_with_shutdown(async {
//!         tokio::signal::ctrl_c().await.ok();
//!     })
//!     .await
//!     .ok();
//! # }
//! ```

mod error;
mod matcher;
mod memory;
mod refresh;
mod render;
mod resolver;
mod roster;
mod worker;

pub use error::EnricherError;
pub use matcher::qualifies;
pub use memory::MatchMemory;
pub use refresh::RosterRefresher;
pub use render::{render_invitation, InvitationFields, MISSING_VALUE};
pub use resolver::RoomResolver;
pub use roster::{Roster, RosterStore};
pub use worker::{EnrichmentWorker, WorkerConfig, FAILURE_LOG_TARGET};
