//! # cms-client
//!
//! Client for the conferencing directory HTTP API: paginated user listing
//! and coSpace (meeting room) lookup with join-detail resolution.
//!
//! The API speaks XML over HTTPS with basic authentication. Detail documents
//! may carry the relevant fields at the root or nested under a vendor
//! namespace; parsing falls back to a tag-suffix search across the whole
//! document.
//!
//! ## Resolving join details
//!
//! ```no_run
//! use cms_client::{CmsClient, CmsConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cms_client::CmsError> {
//!     let config = CmsConfig::new("https://cms.example.com:445/api/v1/", "apiuser", "apipwd");
//!     let client = CmsClient::new(config)?;
//!
//!     if let Some(details) = client.resolve_personal_room("vbidnyy").await {
//!         println!("join at {}", details.web_link);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod types;
mod xml;

pub use client::CmsClient;
pub use config::CmsConfig;
pub use error::CmsError;
pub use types::{CoSpace, CoSpaceDetails, JoinDetails, DEFAULT_PIN};
